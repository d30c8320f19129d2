//! Tie-aware exploration policy.
//!
//! Exploration is driven mostly by how uninformative the current values are
//! (best value not positive, many actions tied) rather than by a flat epsilon,
//! so the exploration rate falls as a state's table fills in.

use rand::{Rng, RngCore};

use super::trait_::{Choice, ChoiceKind, Policy};
use crate::action::Action;
use crate::config::{ExplorationConfig, TieBreadth, TieBreak};
use crate::value::ValueTable;

/// The configurable selection policy used by the learning controller.
///
/// Decision order:
/// 1. best value ≤ 0 and `random_when_nonpositive` → uniform action;
/// 2. flat epsilon → uniform action;
/// 3. tie breadth over threshold (or proportional draw) → uniform action;
/// 4. a single best action, possibly swapped for another power at the same
///    direction while its value is in the mediocre band;
/// 5. several tied best actions including the previous one → repeat it (same
///    power swap applies);
/// 6. otherwise a random (or the first) tied best action.
#[derive(Debug, Clone)]
pub struct AdaptivePolicy {
    config: ExplorationConfig,
}

impl AdaptivePolicy {
    pub fn new(config: ExplorationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    fn uniform(table: &ValueTable, kind: ChoiceKind, rng: &mut dyn RngCore) -> Choice {
        let actions = table.space().as_slice();
        Choice {
            action: actions[rng.gen_range(0..actions.len())],
            kind,
        }
    }

    /// Returns `index`'s action, or with the configured probability a
    /// different power at the same direction when its value is mediocre.
    fn exploit(
        &self,
        table: &ValueTable,
        index: usize,
        kind: ChoiceKind,
        rng: &mut dyn RngCore,
    ) -> Choice {
        let space = table.space();
        if let Some(d) = self.config.diversify {
            let mediocre = table.value_at(index).is_some_and(|v| d.in_band(v));
            if mediocre && rng.gen::<f64>() < d.probability {
                let alternatives = space.power_alternatives(index);
                if !alternatives.is_empty() {
                    let pick = alternatives[rng.gen_range(0..alternatives.len())];
                    return Choice {
                        action: space.as_slice()[pick],
                        kind: ChoiceKind::PowerDiversified,
                    };
                }
            }
        }
        Choice {
            action: space.as_slice()[index],
            kind,
        }
    }
}

impl Default for AdaptivePolicy {
    fn default() -> Self {
        Self::new(ExplorationConfig::default())
    }
}

impl Policy for AdaptivePolicy {
    fn choose(&self, table: &ValueTable, last: Option<&Action>, rng: &mut dyn RngCore) -> Choice {
        let cfg = &self.config;
        let best = table.best_value();
        let tied = table.best_indices();

        // NaN-only tables have no usable maximum.
        if tied.is_empty() {
            return Self::uniform(table, ChoiceKind::Uniform, rng);
        }

        if cfg.random_when_nonpositive && best <= 0.0 {
            return Self::uniform(table, ChoiceKind::NonPositiveExplore, rng);
        }

        if let Some(eps) = cfg.flat_epsilon {
            if rng.gen::<f64>() < eps {
                return Self::uniform(table, ChoiceKind::EpsilonExplore, rng);
            }
        }

        let frac_tied = tied.len() as f64 / table.len() as f64;
        let too_broad = match cfg.tie_breadth {
            TieBreadth::Off => false,
            TieBreadth::Threshold(t) => frac_tied > t,
            TieBreadth::Proportional(scale) => rng.gen::<f64>() < scale * frac_tied,
        };
        if too_broad {
            return Self::uniform(table, ChoiceKind::TieBreadthExplore, rng);
        }

        if tied.len() == 1 {
            return self.exploit(table, tied[0], ChoiceKind::SingleBest, rng);
        }

        if cfg.prefer_last {
            let repeat = last
                .and_then(|a| table.space().index_of(a))
                .filter(|i| tied.contains(i));
            if let Some(i) = repeat {
                return self.exploit(table, i, ChoiceKind::RepeatedLast, rng);
            }
        }

        let actions = table.space().as_slice();
        match cfg.tie_break {
            TieBreak::Random => Choice {
                action: actions[tied[rng.gen_range(0..tied.len())]],
                kind: ChoiceKind::TieRandom,
            },
            TieBreak::First => Choice {
                action: actions[tied[0]],
                kind: ChoiceKind::TieFirst,
            },
        }
    }

    fn name(&self) -> &str {
        "adaptive"
    }
}
