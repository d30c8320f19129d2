//! Event-driven occupant map used to answer cell samples.
//!
//! The host pushes occupant events (created, moved, captured, reached goal)
//! as they happen; the grid keeps per-cell occupant lists, each occupant's
//! current location and per-actuator capture counters. A host environment
//! typically owns a [`SensorGrid`] and forwards
//! [`Environment::sample_cell`](crate::environment::Environment::sample_cell)
//! and `capture_count` to it.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ControllerError, Result};
use crate::state::{CellCodec, ContentCode, OccupantKind};
use crate::Id;

/// An occupant's kind and grid cell. Replaced wholesale when it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub kind: OccupantKind,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct SensorGrid {
    width: u32,
    height: u32,
    codec: CellCodec,
    /// Occupant ids per cell, row-major.
    cells: Vec<Vec<Id>>,
    occupants: HashMap<Id, Occupant>,
    /// Registered actuators and their capture counts.
    captures: BTreeMap<Id, u64>,
}

impl SensorGrid {
    /// Creates an empty `width × height` grid.
    pub fn new(width: u32, height: u32, codec: CellCodec) -> Self {
        Self {
            width,
            height,
            codec,
            cells: vec![Vec::new(); width as usize * height as usize],
            occupants: HashMap::new(),
            captures: BTreeMap::new(),
        }
    }

    /// Discards every occupant and actuator and resizes the grid.
    pub fn reset(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height, self.codec);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn codec(&self) -> &CellCodec {
        &self.codec
    }

    /// Registers an actuator with a zero capture count. Registering twice
    /// keeps the existing count.
    pub fn register_actuator(&mut self, id: impl Into<Id>) {
        self.captures.entry(id.into()).or_insert(0);
    }

    /// Registered actuators in id order.
    pub fn actuators(&self) -> impl Iterator<Item = &Id> {
        self.captures.keys()
    }

    /// Captures credited to `actuator`; zero if it is unknown.
    pub fn capture_count(&self, actuator: &str) -> u64 {
        self.captures.get(actuator).copied().unwrap_or(0)
    }

    pub fn occupant(&self, id: &str) -> Option<&Occupant> {
        self.occupants.get(id)
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Content code of `(x, y)`, or the out-of-bounds sentinel.
    pub fn sample_cell(&self, x: i32, y: i32) -> ContentCode {
        match self.cell_index(x, y) {
            Some(i) => self.codec.encode(
                self.cells[i]
                    .iter()
                    .filter_map(|id| self.occupants.get(id))
                    .map(|o| &o.kind),
            ),
            None => ContentCode::OUT_OF_BOUNDS,
        }
    }

    /// Places a new occupant. An id that is already present is moved instead.
    ///
    /// # Errors
    ///
    /// [`ControllerError::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn occupant_created(
        &mut self,
        id: impl Into<Id>,
        kind: OccupantKind,
        x: i32,
        y: i32,
    ) -> Result<()> {
        let id = id.into();
        let index = self
            .cell_index(x, y)
            .ok_or(ControllerError::OutOfBounds { x, y })?;
        if let Some(previous) = self.occupants.remove(&id) {
            self.detach(&id, &previous);
        }
        self.cells[index].push(id.clone());
        self.occupants.insert(id, Occupant { kind, x, y });
        Ok(())
    }

    /// Moves a known occupant to `(x, y)`.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::UnknownOccupant`] if `id` was never created.
    /// - [`ControllerError::OutOfBounds`] if `(x, y)` is outside the grid; the
    ///   occupant stays where it was.
    pub fn occupant_moved(&mut self, id: &str, x: i32, y: i32) -> Result<()> {
        let index = self
            .cell_index(x, y)
            .ok_or(ControllerError::OutOfBounds { x, y })?;
        let previous = self.remove_known(id)?;
        self.cells[index].push(id.to_string());
        self.occupants.insert(
            id.to_string(),
            Occupant {
                kind: previous.kind,
                x,
                y,
            },
        );
        Ok(())
    }

    /// Credits `actuator` with a capture and removes the occupant.
    ///
    /// The capture is counted even when the occupant is unknown, in which case
    /// the error is still returned.
    pub fn occupant_captured(&mut self, id: &str, actuator: &str) -> Result<()> {
        *self.captures.entry(actuator.to_string()).or_insert(0) += 1;
        self.remove_known(id).map(|_| ())
    }

    /// Removes an occupant that left the world through its goal.
    pub fn occupant_reached_goal(&mut self, id: &str) -> Result<()> {
        self.remove_known(id).map(|_| ())
    }

    fn remove_known(&mut self, id: &str) -> Result<Occupant> {
        match self.occupants.remove(id) {
            Some(occupant) => {
                self.detach(id, &occupant);
                Ok(occupant)
            }
            None => {
                tracing::warn!("Couldn't look up occupant {}", id);
                Err(ControllerError::UnknownOccupant(id.to_string()))
            }
        }
    }

    fn detach(&mut self, id: &str, occupant: &Occupant) {
        if let Some(i) = self.cell_index(occupant.x, occupant.y) {
            self.cells[i].retain(|o| o != id);
        }
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SensorGrid {
        SensorGrid::new(4, 3, CellCodec::default())
    }

    #[test]
    fn out_of_bounds_samples_sentinel() {
        let g = grid();
        assert_eq!(g.sample_cell(-1, 0), ContentCode::OUT_OF_BOUNDS);
        assert_eq!(g.sample_cell(4, 0), ContentCode::OUT_OF_BOUNDS);
        assert_eq!(g.sample_cell(0, 3), ContentCode::OUT_OF_BOUNDS);
        assert!(g.sample_cell(3, 2).is_vacant());
    }

    #[test]
    fn created_occupants_are_encoded() {
        let mut g = grid();
        g.occupant_created("a", OccupantKind::Small, 1, 1).unwrap();
        g.occupant_created("b", OccupantKind::Large, 1, 1).unwrap();
        g.occupant_created("c", OccupantKind::Medium, 2, 1).unwrap();
        assert_eq!(g.sample_cell(1, 1), ContentCode(101));
        assert_eq!(g.sample_cell(2, 1), ContentCode(10));
        assert_eq!(g.occupant_count(), 3);
    }

    #[test]
    fn create_out_of_bounds_fails() {
        let mut g = grid();
        assert_eq!(
            g.occupant_created("a", OccupantKind::Small, 9, 0),
            Err(ControllerError::OutOfBounds { x: 9, y: 0 })
        );
        assert_eq!(g.occupant_count(), 0);
    }

    #[test]
    fn move_replaces_location() {
        let mut g = grid();
        g.occupant_created("a", OccupantKind::Small, 0, 0).unwrap();
        g.occupant_moved("a", 3, 2).unwrap();
        assert!(g.sample_cell(0, 0).is_vacant());
        assert_eq!(g.sample_cell(3, 2), ContentCode(1));
        assert_eq!(
            g.occupant("a"),
            Some(&Occupant {
                kind: OccupantKind::Small,
                x: 3,
                y: 2
            })
        );
    }

    #[test]
    fn move_out_of_bounds_keeps_occupant() {
        let mut g = grid();
        g.occupant_created("a", OccupantKind::Small, 0, 0).unwrap();
        assert!(g.occupant_moved("a", -1, 0).is_err());
        assert_eq!(g.sample_cell(0, 0), ContentCode(1));
    }

    #[test]
    fn recreate_moves_existing_occupant() {
        let mut g = grid();
        g.occupant_created("a", OccupantKind::Small, 0, 0).unwrap();
        g.occupant_created("a", OccupantKind::Medium, 1, 0).unwrap();
        assert!(g.sample_cell(0, 0).is_vacant());
        assert_eq!(g.sample_cell(1, 0), ContentCode(10));
        assert_eq!(g.occupant_count(), 1);
    }

    #[test]
    fn capture_counts_and_removes() {
        let mut g = grid();
        g.register_actuator("fan");
        g.occupant_created("a", OccupantKind::Small, 2, 2).unwrap();
        g.occupant_captured("a", "fan").unwrap();
        assert_eq!(g.capture_count("fan"), 1);
        assert!(g.sample_cell(2, 2).is_vacant());
        assert!(g.occupant("a").is_none());
    }

    #[test]
    fn unknown_occupant_events_are_rejected() {
        let mut g = grid();
        g.register_actuator("fan");
        assert_eq!(
            g.occupant_moved("ghost", 0, 0),
            Err(ControllerError::UnknownOccupant("ghost".into()))
        );
        assert!(g.occupant_reached_goal("ghost").is_err());
        assert!(g.occupant_captured("ghost", "fan").is_err());
        assert_eq!(g.capture_count("fan"), 1);
    }

    #[test]
    fn goal_removes_without_credit() {
        let mut g = grid();
        g.register_actuator("fan");
        g.occupant_created("a", OccupantKind::Large, 1, 2).unwrap();
        g.occupant_reached_goal("a").unwrap();
        assert_eq!(g.capture_count("fan"), 0);
        assert_eq!(g.occupant_count(), 0);
    }

    #[test]
    fn actuators_are_listed_in_order() {
        let mut g = grid();
        g.register_actuator("b");
        g.register_actuator("a");
        g.register_actuator("b");
        let ids: Vec<_> = g.actuators().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut g = grid();
        g.register_actuator("fan");
        g.occupant_created("a", OccupantKind::Small, 0, 0).unwrap();
        g.reset(2, 2);
        assert_eq!(g.width(), 2);
        assert_eq!(g.occupant_count(), 0);
        assert_eq!(g.actuators().count(), 0);
        assert_eq!(g.sample_cell(3, 0), ContentCode::OUT_OF_BOUNDS);
    }
}
