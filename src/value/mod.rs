//! Learned action values: per-state tables and the store that owns them.

pub mod store;
pub mod table;

pub use store::ValueStore;
pub use table::{UpdateRule, ValueTable};
