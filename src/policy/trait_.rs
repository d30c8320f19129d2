//! Policy trait for choosing an actuator's next action.

use rand::RngCore;

use crate::action::Action;
use crate::value::ValueTable;

/// Why a policy picked the action it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKind {
    /// Nothing learned is worth exploiting yet (best value ≤ 0).
    NonPositiveExplore,
    /// Flat epsilon exploration.
    EpsilonExplore,
    /// Too many actions tie for the best value to trust the estimate.
    TieBreadthExplore,
    /// A single action holds the best value.
    SingleBest,
    /// Same direction as the best action, different power.
    PowerDiversified,
    /// The previous action is among the tied best and was repeated.
    RepeatedLast,
    /// Uniform pick among tied best actions.
    TieRandom,
    /// First of the tied best actions.
    TieFirst,
    /// Uniform pick over the whole action space.
    Uniform,
}

impl ChoiceKind {
    /// True for choices that ignore the learned values.
    pub fn is_exploration(&self) -> bool {
        matches!(
            self,
            ChoiceKind::NonPositiveExplore
                | ChoiceKind::EpsilonExplore
                | ChoiceKind::TieBreadthExplore
                | ChoiceKind::PowerDiversified
                | ChoiceKind::Uniform
        )
    }
}

/// An action together with the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub action: Action,
    pub kind: ChoiceKind,
}

/// A policy that selects the next action from one state's value table.
///
/// Implementations must always return a member of the table's action space
/// and must draw all randomness from `rng`, so a seeded generator makes the
/// choice reproducible.
pub trait Policy: Send + Sync {
    /// Chooses an action and reports why.
    ///
    /// # Arguments
    ///
    /// * `table` - Values of the current state
    /// * `last` - The action this actuator performed previously, if any
    /// * `rng` - Source of randomness
    fn choose(&self, table: &ValueTable, last: Option<&Action>, rng: &mut dyn RngCore) -> Choice;

    /// Chooses an action.
    fn select(&self, table: &ValueTable, last: Option<&Action>, rng: &mut dyn RngCore) -> Action {
        self.choose(table, last, rng).action
    }

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
