//! Actions an actuator can be told to perform, and the fixed action space
//! shared by every value table.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, Result};
use crate::types::{Direction, Power, MAX_POWER};

/// An adjustment of an actuator's power and facing direction. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Action {
    pub power: Power,
    pub direction: Direction,
}

impl Action {
    pub fn new(power: Power, direction: Direction) -> Self {
        Self { power, direction }
    }

    /// True if this action leaves the actuator switched off.
    pub fn is_off(&self) -> bool {
        self.power == 0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.power, self.direction)
    }
}

/// The enumerable set of candidate actions.
///
/// Built once and shared (behind an [`Arc`]) by every value table, so an
/// action's index is the same in every state.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpace {
    actions: Vec<Action>,
}

impl ActionSpace {
    /// Creates an action space from an explicit list.
    ///
    /// Duplicate actions are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::EmptyActionSpace`] if `actions` is empty.
    pub fn new(actions: Vec<Action>) -> Result<Self> {
        let mut unique: Vec<Action> = Vec::with_capacity(actions.len());
        for a in actions {
            if !unique.contains(&a) {
                unique.push(a);
            }
        }
        if unique.is_empty() {
            return Err(ControllerError::EmptyActionSpace);
        }
        Ok(Self { actions: unique })
    }

    /// Cross product of `powers` and every compass direction, grouped by
    /// direction (all powers for north, then all powers for north-east, ...).
    pub fn cross(powers: &[Power]) -> Result<Self> {
        let actions = Direction::all()
            .iter()
            .flat_map(|&d| powers.iter().map(move |&p| Action::new(p, d)))
            .collect();
        Self::new(actions)
    }

    /// Every direction at full power only.
    pub fn full_power() -> Self {
        Self {
            actions: Direction::all()
                .iter()
                .map(|&d| Action::new(MAX_POWER, d))
                .collect(),
        }
    }

    /// Wraps this space for sharing between tables.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the action at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    /// Resolves an action to its index in this space.
    pub fn index_of(&self, action: &Action) -> Option<usize> {
        self.actions.iter().position(|a| a == action)
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.index_of(action).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Indices of actions sharing the direction of `index` but with a
    /// different power setting.
    pub fn power_alternatives(&self, index: usize) -> Vec<usize> {
        let Some(base) = self.get(index) else {
            return Vec::new();
        };
        self.actions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.direction == base.direction && a.power != base.power)
            .map(|(i, _)| i)
            .collect()
    }
}
