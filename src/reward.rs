//! Reward shaping for the action an actuator took in its prior state.
//!
//! Combines a capture bonus, the empty-neighborhood idle/waste pair, a
//! consumption penalty and pull shaping. Every term is computed from the
//! *prior* state, since the reward belongs to the action taken there.

use crate::action::Action;
use crate::config::RewardConfig;
use crate::state::StateKey;

/// Environment deltas observed since the actuator's previous decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observations {
    /// Captures credited to the actuator since the previous decision.
    pub new_captures: u64,
    /// Resource units consumed since the previous decision.
    pub consumed: u64,
}

impl Observations {
    /// Derives the deltas from monotonic counters and their last seen values.
    ///
    /// A counter that went backwards is treated as unchanged.
    pub fn from_counters(captures: (u64, u64), consumption: (u64, u64)) -> Self {
        Self {
            new_captures: captures.1.saturating_sub(captures.0),
            consumed: consumption.1.saturating_sub(consumption.0),
        }
    }

    pub fn captured(&self) -> bool {
        self.new_captures > 0
    }
}

/// Occupied ring cells relative to the side an action pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PullSignal {
    /// Occupied cells on the faced side while the actuator is powered.
    pub pulled: usize,
    /// All occupied cells of the ring.
    pub occupied: usize,
}

impl PullSignal {
    /// Re-derives which occupants of `state` the `action` is pulling.
    pub fn derive(state: &StateKey, action: &Action) -> Self {
        let occupied = state.occupied_cells();
        if action.is_off() {
            return Self {
                pulled: 0,
                occupied,
            };
        }
        let pulled = state
            .ring_cells()
            .filter(|c| !c.code.is_vacant() && action.direction.faces(c.side))
            .count();
        Self { pulled, occupied }
    }

    /// Occupants present in the ring but not being pulled.
    pub fn missed(&self) -> usize {
        if self.pulled > 0 {
            0
        } else {
            self.occupied
        }
    }
}

/// Computes scalar rewards from a [`RewardConfig`].
#[derive(Debug, Clone)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for taking `action` in `prior`, given what happened since.
    ///
    /// # Components
    ///
    /// 1. **Capture**: `+capture_bonus` if anything was captured.
    /// 2. **Empty neighborhood**: when `prior` is the empty state,
    ///    `+idle_bonus` for a zero-power action, `−wasted_power_penalty`
    ///    otherwise.
    /// 3. **Consumption**: `−consumption_per_unit × consumed`.
    /// 4. **Pull**: `+per_pulled × pulled` while pulling occupants, else
    ///    `per_missed × occupied` when occupants are being ignored.
    pub fn compute(&self, prior: &StateKey, action: &Action, obs: &Observations) -> f64 {
        self.terms(prior, action, obs).0
    }

    /// Like [`compute`](Self::compute), but returns `None` when no term fired
    /// and the configuration asks for such transitions to be skipped.
    pub fn assess(&self, prior: &StateKey, action: &Action, obs: &Observations) -> Option<f64> {
        let (reward, fired) = self.terms(prior, action, obs);
        if fired || !self.config.skip_unrewarded {
            Some(reward)
        } else {
            None
        }
    }

    /// The summed reward and whether any non-zero term contributed to it.
    fn terms(&self, prior: &StateKey, action: &Action, obs: &Observations) -> (f64, bool) {
        let cfg = &self.config;
        let mut reward = 0.0;
        let mut fired = false;
        let mut add = |term: f64| {
            if term != 0.0 {
                reward += term;
                fired = true;
            }
        };

        // 1. Capture
        if obs.captured() {
            add(cfg.capture_bonus);
        }

        // 2. Empty neighborhood
        if prior.is_empty() {
            if action.is_off() {
                add(cfg.idle_bonus);
            } else {
                add(-cfg.wasted_power_penalty);
            }
        }

        // 3. Consumption
        add(-cfg.consumption_per_unit * obs.consumed as f64);

        // 4. Pull
        if let Some(pull) = cfg.pull {
            let signal = PullSignal::derive(prior, action);
            if signal.pulled > 0 {
                add(pull.per_pulled * signal.pulled as f64);
            } else {
                add(pull.per_missed * signal.missed() as f64);
            }
        }

        (reward, fired)
    }
}
