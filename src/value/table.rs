//! Per-state action values.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionSpace};
use crate::error::{ControllerError, Result};

/// How a reward is folded into an action's value estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateRule {
    /// Incremental mean of every reward the action has received.
    Average,
    /// One-step Q-learning backup:
    /// `v += α · (r + γ · max_a' next[a'] − v)`.
    TemporalDifference { learning_rate: f64, discount: f64 },
}

impl UpdateRule {
    /// True if the rule bootstraps from the next state's values.
    pub fn bootstraps(&self) -> bool {
        matches!(self, UpdateRule::TemporalDifference { .. })
    }
}

/// Value estimates for every action of a shared [`ActionSpace`] in one state.
#[derive(Debug, Clone)]
pub struct ValueTable {
    space: Arc<ActionSpace>,
    values: Vec<f64>,
    trials: Vec<u32>,
}

impl ValueTable {
    /// Creates a zero-initialized table over `space`.
    pub fn new(space: Arc<ActionSpace>) -> Self {
        let n = space.len();
        Self {
            space,
            values: vec![0.0; n],
            trials: vec![0; n],
        }
    }

    /// The action space this table is defined over.
    pub fn space(&self) -> &Arc<ActionSpace> {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn index_of(&self, action: &Action) -> Result<usize> {
        self.space
            .index_of(action)
            .ok_or(ControllerError::UnknownAction(*action))
    }

    /// Averaging rule: `v = (v·n + r) / (n + 1)`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownAction`] if `action` is not in the space; the
    /// table is left untouched.
    pub fn update_average(&mut self, action: &Action, reward: f64) -> Result<()> {
        let i = self.index_of(action)?;
        let n = self.trials[i] as f64;
        self.values[i] = (self.values[i] * n + reward) / (n + 1.0);
        self.trials[i] += 1;
        Ok(())
    }

    /// Q-learning rule: `v += α · (r + γ · next_best − v)`.
    ///
    /// `next_best` is the best value of the state reached after taking
    /// `action`, which may be this very table.
    pub fn update_td(
        &mut self,
        action: &Action,
        reward: f64,
        next_best: f64,
        learning_rate: f64,
        discount: f64,
    ) -> Result<()> {
        let i = self.index_of(action)?;
        let v = self.values[i];
        self.values[i] = v + learning_rate * (reward + discount * next_best - v);
        self.trials[i] += 1;
        Ok(())
    }

    /// Applies `rule`. `next_best` is ignored by [`UpdateRule::Average`].
    pub fn apply(
        &mut self,
        rule: UpdateRule,
        action: &Action,
        reward: f64,
        next_best: f64,
    ) -> Result<()> {
        match rule {
            UpdateRule::Average => self.update_average(action, reward),
            UpdateRule::TemporalDifference {
                learning_rate,
                discount,
            } => self.update_td(action, reward, next_best, learning_rate, discount),
        }
    }

    /// `max_a value[a]`.
    pub fn best_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Indices of every action whose value equals the best value.
    pub fn best_indices(&self) -> Vec<usize> {
        let best = self.best_value();
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == best)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn value(&self, action: &Action) -> Option<f64> {
        self.space.index_of(action).map(|i| self.values[i])
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Number of updates `action` has received.
    pub fn trials(&self, action: &Action) -> Option<u32> {
        self.space.index_of(action).map(|i| self.trials[i])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.values {
            write!(f, "{:.2}  ", v)?;
        }
        Ok(())
    }
}
