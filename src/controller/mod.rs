//! The per-actuator learning loop.
//!
//! Each call to [`LearningController::advance`] walks every actuator the
//! environment lists and, for each one:
//!
//! 1. rebuilds its [`StateKey`] and compares it to the cached one;
//! 2. consults the [`DecisionCadence`](crate::config::DecisionCadence) to see
//!    whether a decision is due;
//! 3. ensures the current state has a value table;
//! 4. rewards the previous action in the state it was chosen in and updates
//!    that state's table;
//! 5. selects the next action from the current table and applies it.

pub mod metrics;
pub mod run_state;


use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use qtty::{Quantity, Second};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::action::ActionSpace;
use crate::config::ControllerConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::policy::{AdaptivePolicy, Policy};
use crate::reward::{Observations, RewardShaper};
use crate::state::StateKey;
use crate::units::{self, SameDim};
use crate::value::ValueStore;
use crate::Id;

pub use metrics::ControllerMetrics;
pub use run_state::{Decision, RunState};

/// One learner per actuator over a single shared value store.
///
/// Actuators whose neighborhoods encode to the same [`StateKey`] read and write
/// the same value table; nothing else is shared between them.
pub struct LearningController {
    config: ControllerConfig,
    space: Arc<ActionSpace>,
    store: ValueStore,
    runs: HashMap<Id, RunState>,
    policy: Box<dyn Policy>,
    shaper: RewardShaper,
    rng: StdRng,
    metrics: ControllerMetrics,
}

impl LearningController {
    /// Creates a controller using an [`AdaptivePolicy`] built from the
    /// configuration's exploration flags.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`ControllerConfig::validate`] reports.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        let policy = AdaptivePolicy::new(config.exploration);
        Self::with_policy(config, Box::new(policy))
    }

    /// Creates a controller that selects actions with `policy`.
    pub fn with_policy(config: ControllerConfig, policy: Box<dyn Policy>) -> Result<Self> {
        config.validate()?;
        let space = config.action_space()?.shared();
        tracing::debug!(
            "Learning controller: {} actions, {:?}, policy {}",
            space.len(),
            config.update_rule,
            policy.name()
        );
        Ok(Self {
            store: ValueStore::new(Arc::clone(&space)),
            space,
            runs: HashMap::new(),
            policy,
            shaper: RewardShaper::new(config.reward),
            rng: StdRng::seed_from_u64(config.seed),
            metrics: ControllerMetrics::default(),
            config,
        })
    }

    /// Runs one tick of `delta` for every actuator `env` lists.
    pub fn advance<U>(&mut self, env: &mut dyn Environment, delta: Quantity<U>)
    where
        U: SameDim<Second>,
    {
        let dt = units::seconds(delta);
        self.metrics.ticks += 1;
        for id in env.actuators() {
            self.step(env, &id, dt);
        }
    }

    /// [`advance`](Self::advance) with the tick length in milliseconds.
    pub fn advance_ms(&mut self, env: &mut dyn Environment, ms: f64) {
        self.advance(env, units::millis(ms));
    }

    /// Drops everything remembered about `id`. Learned values are kept.
    pub fn forget(&mut self, id: &str) -> Option<RunState> {
        self.runs.remove(id)
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn action_space(&self) -> &Arc<ActionSpace> {
        &self.space
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn metrics(&self) -> &ControllerMetrics {
        &self.metrics
    }

    pub fn run_state(&self, id: &str) -> Option<&RunState> {
        self.runs.get(id)
    }

    /// Number of actuators with run state.
    pub fn tracked(&self) -> usize {
        self.runs.len()
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    fn step(&mut self, env: &mut dyn Environment, id: &str, dt: f64) {
        let placement = env.placement(id);
        let tag = env.type_tag(id);
        let key = StateKey::build(&placement, &tag, |x, y| env.sample_cell(x, y));
        let captures = env.capture_count(id);
        let consumption = env.consumption_count(id);
        let verbose = env.is_selected(id);

        let mut changed = false;
        let rs = match self.runs.entry(id.to_string()) {
            Entry::Occupied(e) => {
                let rs = e.into_mut();
                rs.since_decision += dt;
                if rs.observe(key) {
                    changed = true;
                    self.metrics.state_changes += 1;
                }
                rs
            }
            Entry::Vacant(e) => {
                tracing::debug!("Tracking actuator {}", id);
                e.insert(RunState::new(key, captures, consumption))
            }
        };

        let due = rs.decision.is_none()
            || self.config.cadence.should_decide(changed, rs.since_decision);
        if !due {
            return;
        }

        let known = self.store.len();
        self.store.get_or_create(&rs.current);
        if self.store.len() > known {
            self.metrics.tables_created += 1;
            tracing::debug!("New state seen by {}: {} states known", id, self.store.len());
        }

        if let Some(decision) = &rs.decision {
            let obs = Observations::from_counters(
                (rs.captures_seen, captures),
                (rs.consumption_seen, consumption),
            );
            let assessed = self
                .shaper
                .assess(&decision.state, &decision.action, &obs);
            let outcome = assessed.map(|reward| {
                let result = self.store.update(
                    &decision.state,
                    &decision.action,
                    reward,
                    &rs.current,
                    self.config.update_rule,
                );
                (reward, result)
            });
            match outcome {
                None => {
                    if verbose {
                        tracing::debug!("{}: nothing to credit {} with", id, decision.action);
                    }
                }
                Some((reward, Ok(()))) => {
                    self.metrics.record_update(reward);
                    if verbose {
                        tracing::debug!(
                            "{}: reward {:.2} for {} (captures +{}, consumed {})",
                            id,
                            reward,
                            decision.action,
                            obs.new_captures,
                            obs.consumed
                        );
                    }
                }
                Some((_, Err(e))) => {
                    self.metrics.discarded_updates += 1;
                    tracing::warn!("Discarding update for {}: {}", id, e);
                }
            }
        }

        let table = match self.store.get(&rs.current) {
            Some(table) => table,
            None => {
                tracing::warn!("No value table for the current state of {}", id);
                return;
            }
        };
        let choice = self.policy.choose(table, rs.last_action(), &mut self.rng);
        self.metrics.record_choice(choice.kind);

        if verbose {
            tracing::debug!(
                "{}: state\n{}\nvalues: {}\nchose {} ({:?})",
                id,
                rs.current,
                table,
                choice.action,
                choice.kind
            );
        }

        rs.record(choice.action, captures, consumption);
        self.metrics.record_streak(rs.repeats);
        if verbose && rs.repeats > 0 {
            tracing::debug!("{}: kept {} for {} decisions", id, choice.action, rs.repeats + 1);
        }
        env.apply_action(id, choice.action);
    }
}

impl std::fmt::Debug for LearningController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningController")
            .field("config", &self.config)
            .field("policy", &self.policy.name())
            .field("states", &self.store.len())
            .field("actuators", &self.runs.len())
            .finish()
    }
}
