//! The host world as seen by the learning controller.

use crate::action::Action;
use crate::state::ContentCode;
use crate::types::{Placement, TypeTag};
use crate::Id;

/// What the controller needs from the host simulation.
///
/// The controller never owns world state: it samples cells, reads monotonic
/// counters and pushes actions through this trait once per tick.
pub trait Environment {
    /// Actuators currently under control.
    fn actuators(&self) -> Vec<Id>;

    /// Content code of the grid cell `(x, y)`.
    ///
    /// Must not fail for coordinates outside the world; those report
    /// [`ContentCode::OUT_OF_BOUNDS`].
    fn sample_cell(&self, x: i32, y: i32) -> ContentCode;

    /// Total captures credited to `id` so far. Never decreases.
    fn capture_count(&self, id: &str) -> u64;

    /// Total resource units `id` has consumed so far. Never decreases.
    fn consumption_count(&self, id: &str) -> u64;

    /// Footprint and position of `id`.
    fn placement(&self, id: &str) -> Placement;

    fn type_tag(&self, id: &str) -> TypeTag;

    /// Sets `id`'s power and direction. Best effort.
    fn apply_action(&mut self, id: &str, action: Action);

    /// Whether `id` is selected in the host UI. Selected actuators get verbose
    /// traces.
    fn is_selected(&self, _id: &str) -> bool {
        false
    }
}
