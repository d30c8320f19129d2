//! Policy trait and implementations.

pub mod adaptive;
pub mod random;
pub mod trait_;

pub use adaptive::AdaptivePolicy;
pub use random::RandomPolicy;
pub use trait_::{Choice, ChoiceKind, Policy};
