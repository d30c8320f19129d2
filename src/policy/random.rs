//! Random policy for baselines.

use rand::{Rng, RngCore};

use super::trait_::{Choice, ChoiceKind, Policy};
use crate::action::Action;
use crate::value::ValueTable;

/// Uniformly random action selection, ignoring learned values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for RandomPolicy {
    fn choose(&self, table: &ValueTable, _last: Option<&Action>, rng: &mut dyn RngCore) -> Choice {
        let space = table.space();
        let i = rng.gen_range(0..space.len());
        Choice {
            action: space.as_slice()[i],
            kind: ChoiceKind::Uniform,
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}
