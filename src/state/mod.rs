//! State abstraction: cell content codes and the neighborhood state key.

pub mod cell;
pub mod key;

pub use cell::{CellCodec, ContentCode, OccupantKind};
pub use key::{RingCell, StateKey, RADIUS};
