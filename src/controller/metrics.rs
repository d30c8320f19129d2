//! Running counters for a learning controller.

use std::collections::HashMap;
use std::fmt;

use crate::policy::ChoiceKind;

/// Counters accumulated over the lifetime of a controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerMetrics {
    /// Calls to `advance`.
    pub ticks: u64,
    /// Actions selected and applied.
    pub decisions: u64,
    /// Value updates applied.
    pub updates: u64,
    /// Value updates rejected by the table or store.
    pub discarded_updates: u64,
    /// Distinct states that received a value table.
    pub tables_created: u64,
    /// Ticks on which an actuator's neighborhood changed.
    pub state_changes: u64,
    /// Sum of every reward fed into an update.
    pub cumulative_reward: f64,
    /// Decisions per [`ChoiceKind`].
    pub choices: HashMap<ChoiceKind, u64>,
    /// Most consecutive repeats of one action by a single actuator.
    pub longest_streak: u32,
}

impl ControllerMetrics {
    pub fn record_choice(&mut self, kind: ChoiceKind) {
        self.decisions += 1;
        *self.choices.entry(kind).or_insert(0) += 1;
    }

    pub fn record_update(&mut self, reward: f64) {
        self.updates += 1;
        self.cumulative_reward += reward;
    }

    pub fn record_streak(&mut self, repeats: u32) {
        self.longest_streak = self.longest_streak.max(repeats);
    }

    pub fn choice_count(&self, kind: ChoiceKind) -> u64 {
        self.choices.get(&kind).copied().unwrap_or(0)
    }

    /// Fraction of decisions that ignored the learned values.
    pub fn exploration_rate(&self) -> f64 {
        if self.decisions == 0 {
            return 0.0;
        }
        let explored: u64 = self
            .choices
            .iter()
            .filter(|(k, _)| k.is_exploration())
            .map(|(_, n)| n)
            .sum();
        explored as f64 / self.decisions as f64
    }

    pub fn mean_reward(&self) -> f64 {
        if self.updates == 0 {
            0.0
        } else {
            self.cumulative_reward / self.updates as f64
        }
    }
}

impl fmt::Display for ControllerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Controller Metrics ({} ticks) ===", self.ticks)?;
        writeln!(f, "  Decisions:          {}", self.decisions)?;
        writeln!(
            f,
            "  Exploration rate:   {:.1}%",
            self.exploration_rate() * 100.0
        )?;
        writeln!(f, "  Updates:            {}", self.updates)?;
        writeln!(f, "  Discarded updates:  {}", self.discarded_updates)?;
        writeln!(f, "  States learned:     {}", self.tables_created)?;
        writeln!(f, "  State changes:      {}", self.state_changes)?;
        writeln!(f, "  Longest streak:     {}", self.longest_streak)?;
        write!(f, "  Mean reward:        {:.2}", self.mean_reward())
    }
}
