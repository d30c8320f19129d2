//! Configuration for the learning controller.
//!
//! The controller family differs only in its update rule, decision cadence,
//! reward constants and exploration flags, so all of them are one
//! [`ControllerConfig`]. The named presets reproduce the tuned variants; their
//! constants are empirical and have no deeper derivation.

use qtty::{Quantity, Second};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::ActionSpace;
use crate::error::{ControllerError, Result};
use crate::state::CellCodec;
use crate::types::{Power, MAX_POWER};
use crate::value::UpdateRule;

/// When an actuator re-decides its action.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecisionCadence {
    /// Only when the actuator's neighborhood changed.
    OnChange,
    /// Every `interval`, whether or not the neighborhood changed.
    FixedInterval(Quantity<Second>),
    /// On change, and at least once every `interval`.
    ChangeOrInterval(Quantity<Second>),
}

impl DecisionCadence {
    /// The forcing interval in seconds, if the cadence has one.
    pub fn interval_seconds(&self) -> Option<f64> {
        match self {
            DecisionCadence::OnChange => None,
            DecisionCadence::FixedInterval(t) | DecisionCadence::ChangeOrInterval(t) => {
                Some(t.value())
            }
        }
    }

    /// Whether to decide now, given whether the state changed and the seconds
    /// elapsed since the last decision.
    pub fn should_decide(&self, changed: bool, elapsed: f64) -> bool {
        match self {
            DecisionCadence::OnChange => changed,
            DecisionCadence::FixedInterval(t) => elapsed >= t.value(),
            DecisionCadence::ChangeOrInterval(t) => changed || elapsed >= t.value(),
        }
    }
}

/// How the breadth of ties for the best value drives exploration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TieBreadth {
    Off,
    /// Explore uniformly when `tied / |actions|` exceeds the threshold.
    Threshold(f64),
    /// Explore with probability `scale · tied / |actions|`.
    Proportional(f64),
}

/// How to pick among tied best actions when nothing else decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TieBreak {
    Random,
    First,
}

/// Occasional substitution of a different power at the best direction, while
/// the best value sits in a mediocre band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerDiversification {
    pub probability: f64,
    /// Exclusive lower bound of the band.
    pub band_low: f64,
    /// Exclusive upper bound of the band.
    pub band_high: f64,
}

impl PowerDiversification {
    pub fn in_band(&self, value: f64) -> bool {
        value > self.band_low && value < self.band_high
    }
}

impl Default for PowerDiversification {
    fn default() -> Self {
        Self {
            probability: 0.25,
            band_low: 0.05,
            band_high: 5.0,
        }
    }
}

/// Exploration flags for [`crate::policy::AdaptivePolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplorationConfig {
    /// Pick uniformly while the best value is ≤ 0.
    pub random_when_nonpositive: bool,
    /// Flat epsilon-greedy exploration probability.
    pub flat_epsilon: Option<f64>,
    pub tie_breadth: TieBreadth,
    /// Repeat the previous action when it is among the tied best.
    pub prefer_last: bool,
    pub diversify: Option<PowerDiversification>,
    pub tie_break: TieBreak,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            random_when_nonpositive: false,
            flat_epsilon: None,
            tie_breadth: TieBreadth::Off,
            prefer_last: true,
            diversify: None,
            tie_break: TieBreak::Random,
        }
    }
}

/// Reward for powering toward occupants on the faced side of the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PullShaping {
    /// Reward per occupied cell on the side the actuator pulls from.
    pub per_pulled: f64,
    /// Reward per occupied cell when nothing is being pulled (negative).
    pub per_missed: f64,
}

impl Default for PullShaping {
    fn default() -> Self {
        Self {
            per_pulled: 2.0,
            per_missed: -1.0,
        }
    }
}

/// Reward constants. Terms are summed; a zero constant disables its term.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    /// Flat bonus when the actuator captured something since its last decision.
    pub capture_bonus: f64,
    /// Bonus for a zero-power action taken in the empty state.
    pub idle_bonus: f64,
    /// Penalty (subtracted) for a powered action taken in the empty state.
    pub wasted_power_penalty: f64,
    /// Penalty (subtracted) per resource unit consumed.
    pub consumption_per_unit: f64,
    pub pull: Option<PullShaping>,
    /// Leave the value table untouched for transitions in which no reward
    /// term fired, instead of folding in a zero.
    pub skip_unrewarded: bool,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            capture_bonus: 10.0,
            idle_bonus: 0.0,
            wasted_power_penalty: 0.0,
            consumption_per_unit: 0.0,
            pull: None,
            skip_unrewarded: false,
        }
    }
}

/// Full configuration of a [`crate::controller::LearningController`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Power levels offered at every direction.
    pub powers: Vec<Power>,
    pub update_rule: UpdateRule,
    pub cadence: DecisionCadence,
    pub reward: RewardConfig,
    pub exploration: ExplorationConfig,
    pub codec: CellCodec,
    /// Seed of the controller's random number generator.
    pub seed: u64,
}

impl ControllerConfig {
    /// Full power only, averaging, capture reward, 20% flat exploration.
    ///
    /// Only capturing transitions are averaged in, so a value is the mean of
    /// the capture rewards its action earned.
    pub fn capture_averaging() -> Self {
        Self {
            powers: vec![MAX_POWER],
            update_rule: UpdateRule::Average,
            cadence: DecisionCadence::OnChange,
            reward: RewardConfig {
                skip_unrewarded: true,
                ..RewardConfig::default()
            },
            exploration: ExplorationConfig {
                flat_epsilon: Some(0.2),
                prefer_last: false,
                ..ExplorationConfig::default()
            },
            codec: CellCodec::default(),
            seed: 0,
        }
    }

    /// Powers 0/2/4, averaging, capture reward minus consumption, exploration
    /// proportional to tie breadth, repeats the previous action on ties.
    pub fn consumption_averaging() -> Self {
        Self {
            powers: vec![0, 2, 4],
            update_rule: UpdateRule::Average,
            cadence: DecisionCadence::OnChange,
            reward: RewardConfig {
                consumption_per_unit: 1.0 / 24.0,
                ..RewardConfig::default()
            },
            exploration: ExplorationConfig {
                tie_breadth: TieBreadth::Proportional(0.5),
                prefer_last: true,
                tie_break: TieBreak::First,
                ..ExplorationConfig::default()
            },
            codec: CellCodec::default(),
            seed: 0,
        }
    }

    /// Powers 0/2/4, Q-learning, empty-state and pull shaping, decides on
    /// change and at least every 800 ms.
    pub fn temporal_difference() -> Self {
        Self {
            powers: vec![0, 2, 4],
            update_rule: UpdateRule::TemporalDifference {
                learning_rate: 0.7,
                discount: 0.3,
            },
            cadence: DecisionCadence::ChangeOrInterval(Quantity::<Second>::new(0.8)),
            reward: RewardConfig {
                capture_bonus: 30.0,
                idle_bonus: 8.0,
                wasted_power_penalty: 8.0,
                consumption_per_unit: 0.0,
                pull: Some(PullShaping::default()),
                skip_unrewarded: false,
            },
            exploration: ExplorationConfig {
                random_when_nonpositive: true,
                tie_breadth: TieBreadth::Threshold(0.95),
                prefer_last: false,
                ..ExplorationConfig::default()
            },
            codec: CellCodec::default(),
            seed: 0,
        }
    }

    /// Q-learning with power diversification in the mediocre band and
    /// stability on ties.
    pub fn power_diversifying() -> Self {
        let base = Self::temporal_difference();
        Self {
            reward: RewardConfig {
                capture_bonus: 50.0,
                ..base.reward
            },
            exploration: ExplorationConfig {
                prefer_last: true,
                diversify: Some(PowerDiversification::default()),
                ..base.exploration
            },
            ..base
        }
    }

    /// Builds the action space described by `powers`.
    pub fn action_space(&self) -> Result<ActionSpace> {
        ActionSpace::cross(&self.powers)
    }

    /// Checks that every probability, rate and band is usable.
    pub fn validate(&self) -> Result<()> {
        if self.powers.is_empty() {
            return Err(ControllerError::EmptyActionSpace);
        }
        if let Some(p) = self.powers.iter().find(|&&p| p > MAX_POWER) {
            return invalid(format!("power {} exceeds maximum {}", p, MAX_POWER));
        }
        if let UpdateRule::TemporalDifference {
            learning_rate,
            discount,
        } = self.update_rule
        {
            if !(learning_rate > 0.0 && learning_rate <= 1.0) {
                return invalid(format!("learning rate {} not in (0, 1]", learning_rate));
            }
            if !(0.0..=1.0).contains(&discount) {
                return invalid(format!("discount {} not in [0, 1]", discount));
            }
        }
        if let Some(t) = self.cadence.interval_seconds() {
            if !(t.is_finite() && t > 0.0) {
                return invalid(format!("decision interval {} s must be positive", t));
            }
        }

        let ex = &self.exploration;
        if let Some(eps) = ex.flat_epsilon {
            check_probability("epsilon", eps)?;
        }
        match ex.tie_breadth {
            TieBreadth::Threshold(t) => check_probability("tie-breadth threshold", t)?,
            TieBreadth::Proportional(s) if !(s.is_finite() && s >= 0.0) => {
                return invalid(format!("tie-breadth scale {} must be non-negative", s));
            }
            _ => {}
        }
        if let Some(d) = ex.diversify {
            check_probability("diversification probability", d.probability)?;
            if d.band_low >= d.band_high {
                return invalid(format!(
                    "diversification band ({}, {}) is empty",
                    d.band_low, d.band_high
                ));
            }
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::temporal_difference()
    }
}

fn invalid<T>(msg: String) -> Result<T> {
    Err(ControllerError::InvalidConfig(msg))
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        invalid(format!("{} {} not in [0, 1]", name, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for cfg in [
            ControllerConfig::capture_averaging(),
            ControllerConfig::consumption_averaging(),
            ControllerConfig::temporal_difference(),
            ControllerConfig::power_diversifying(),
        ] {
            assert_eq!(cfg.validate(), Ok(()));
        }
    }

    #[test]
    fn preset_action_spaces() {
        assert_eq!(
            ControllerConfig::capture_averaging()
                .action_space()
                .unwrap()
                .len(),
            8
        );
        assert_eq!(
            ControllerConfig::temporal_difference()
                .action_space()
                .unwrap()
                .len(),
            24
        );
    }

    #[test]
    fn empty_powers_rejected() {
        let cfg = ControllerConfig {
            powers: vec![],
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ControllerError::EmptyActionSpace));
    }

    #[test]
    fn bad_learning_rate_rejected() {
        let cfg = ControllerConfig {
            update_rule: UpdateRule::TemporalDifference {
                learning_rate: 0.0,
                discount: 0.5,
            },
            ..ControllerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ControllerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_band_rejected() {
        let mut cfg = ControllerConfig::power_diversifying();
        cfg.exploration.diversify = Some(PowerDiversification {
            probability: 0.5,
            band_low: 5.0,
            band_high: 1.0,
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn cadence_decisions() {
        let every = DecisionCadence::FixedInterval(Quantity::<Second>::new(1.0));
        assert!(!every.should_decide(true, 0.5));
        assert!(every.should_decide(false, 1.0));

        let both = DecisionCadence::ChangeOrInterval(Quantity::<Second>::new(1.0));
        assert!(both.should_decide(true, 0.0));
        assert!(both.should_decide(false, 1.5));
        assert!(!both.should_decide(false, 0.2));

        assert!(DecisionCadence::OnChange.should_decide(true, 0.0));
        assert!(!DecisionCadence::OnChange.should_decide(false, 100.0));
    }

    #[test]
    fn diversifying_preset_inherits_td() {
        let cfg = ControllerConfig::power_diversifying();
        assert!(cfg.update_rule.bootstraps());
        assert_eq!(cfg.reward.capture_bonus, 50.0);
        assert_eq!(cfg.reward.idle_bonus, 8.0);
        assert!(cfg.exploration.prefer_last);
    }

    #[test]
    fn only_capture_averaging_skips_unrewarded() {
        assert!(ControllerConfig::capture_averaging().reward.skip_unrewarded);
        assert!(!ControllerConfig::consumption_averaging().reward.skip_unrewarded);
        assert!(!ControllerConfig::temporal_difference().reward.skip_unrewarded);
        assert!(!ControllerConfig::power_diversifying().reward.skip_unrewarded);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_json() {
        let cfg = ControllerConfig::power_diversifying();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
