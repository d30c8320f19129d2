//! ventrl - Value-learning controller for directional actuators on a grid
//!
//! Each actuator observes the ring of cells around it, encodes the ring into a
//! discrete state key, and picks a `(power, direction)` action from a value
//! table learned by incremental averaging or temporal-difference backups.

pub mod action;
pub mod config;
pub mod controller;
pub mod environment;
pub mod error;
pub mod policy;
pub mod reward;
pub mod sensors;
pub mod state;
pub mod types;
pub mod units;
pub mod value;

pub use action::{Action, ActionSpace};
pub use config::ControllerConfig;
pub use controller::LearningController;
pub use environment::Environment;
pub use error::{ControllerError, Result};
pub use state::StateKey;
pub use units::{convert, SameDim};

/// Identifier type used for actuators and occupants.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
