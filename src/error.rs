use thiserror::Error;

use crate::action::Action;
use crate::Id;

/// Errors raised by the learning controller and its collaborators.
///
/// Most of these are non-fatal: the controller logs them and skips the
/// dependent step for the current tick.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    #[error("Action {0} is not a member of this table's action space")]
    UnknownAction(Action),

    #[error("No value table recorded for the requested state")]
    MissingTable,

    #[error("Action space must contain at least one action")]
    EmptyActionSpace,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown occupant: {0}")]
    UnknownOccupant(Id),

    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
}

pub type Result<T> = std::result::Result<T, ControllerError>;
