//! Per-actuator bookkeeping carried between ticks.

use crate::action::Action;
use crate::state::StateKey;

/// The last action an actuator took and the state it was chosen in.
///
/// The reward observed later is credited to this pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub state: StateKey,
    pub action: Action,
}

/// Everything the controller remembers about one actuator.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Neighborhood observed on the latest tick.
    pub current: StateKey,
    pub decision: Option<Decision>,
    /// Capture counter value at the last decision.
    pub captures_seen: u64,
    /// Consumption counter value at the last decision.
    pub consumption_seen: u64,
    /// Seconds since the last decision.
    pub since_decision: f64,
    /// Consecutive decisions that kept the same action.
    pub repeats: u32,
}

impl RunState {
    /// Run state for an actuator seen for the first time.
    ///
    /// Counter watermarks start at the current values so that captures made
    /// before the controller took over are not rewarded.
    pub fn new(current: StateKey, captures: u64, consumption: u64) -> Self {
        Self {
            current,
            decision: None,
            captures_seen: captures,
            consumption_seen: consumption,
            since_decision: 0.0,
            repeats: 0,
        }
    }

    /// Caches `key` as the current state. Returns true if it differs from the
    /// cached one.
    pub fn observe(&mut self, key: StateKey) -> bool {
        if key == self.current {
            return false;
        }
        self.current = key;
        true
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.decision.as_ref().map(|d| &d.action)
    }

    /// Records a new decision taken in the current state and resets the
    /// decision clock and watermarks.
    pub fn record(&mut self, action: Action, captures: u64, consumption: u64) {
        if self.last_action() == Some(&action) {
            self.repeats += 1;
        } else {
            self.repeats = 0;
        }
        self.decision = Some(Decision {
            state: self.current.clone(),
            action,
        });
        self.captures_seen = captures;
        self.consumption_seen = consumption;
        self.since_decision = 0.0;
    }
}
