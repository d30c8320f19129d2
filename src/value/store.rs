//! The state → value-table map shared by every actuator of a controller.

use std::collections::HashMap;
use std::sync::Arc;

use super::table::{UpdateRule, ValueTable};
use crate::action::{Action, ActionSpace};
use crate::error::{ControllerError, Result};
use crate::state::StateKey;

/// Owns one [`ValueTable`] per observed [`StateKey`].
///
/// Tables are created lazily and never evicted. Actuators that observe an
/// identical neighborhood read and write the same table.
#[derive(Debug, Clone)]
pub struct ValueStore {
    space: Arc<ActionSpace>,
    tables: HashMap<StateKey, ValueTable>,
}

impl ValueStore {
    pub fn new(space: Arc<ActionSpace>) -> Self {
        Self {
            space,
            tables: HashMap::new(),
        }
    }

    pub fn space(&self) -> &Arc<ActionSpace> {
        &self.space
    }

    /// Returns the table for `key`, creating a zeroed one if needed.
    pub fn get_or_create(&mut self, key: &StateKey) -> &mut ValueTable {
        let space = &self.space;
        self.tables
            .entry(key.clone())
            .or_insert_with(|| ValueTable::new(Arc::clone(space)))
    }

    pub fn get(&self, key: &StateKey) -> Option<&ValueTable> {
        self.tables.get(key)
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.tables.contains_key(key)
    }

    /// Folds `reward` for `action` taken in `prior` into `prior`'s table.
    ///
    /// For bootstrapping rules the target is the best value of `current`'s
    /// table, read before `prior` is modified (the two may be the same state).
    /// A `current` state without a table bootstraps from zero.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::MissingTable`] if `prior` was never recorded.
    /// - [`ControllerError::UnknownAction`] if `action` is not in the space.
    pub fn update(
        &mut self,
        prior: &StateKey,
        action: &Action,
        reward: f64,
        current: &StateKey,
        rule: UpdateRule,
    ) -> Result<()> {
        let next_best = if rule.bootstraps() {
            self.tables
                .get(current)
                .map(ValueTable::best_value)
                .unwrap_or(0.0)
        } else {
            0.0
        };
        let table = self
            .tables
            .get_mut(prior)
            .ok_or(ControllerError::MissingTable)?;
        table.apply(rule, action, reward, next_best)
    }

    /// Number of distinct states seen so far.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ValueTable)> {
        self.tables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ContentCode;
    use crate::types::{Direction, Footprint, Placement, TypeTag};

    fn key(code: i32) -> StateKey {
        StateKey::build(
            &Placement::new(Footprint::unit(), 0, 0),
            &TypeTag::new("vacuum"),
            |_, _| ContentCode(code),
        )
    }

    fn store() -> ValueStore {
        ValueStore::new(ActionSpace::cross(&[0, 4]).unwrap().shared())
    }

    #[test]
    fn get_or_create_is_lazy_and_idempotent() {
        let mut s = store();
        assert!(s.is_empty());
        s.get_or_create(&key(1));
        s.get_or_create(&key(1));
        assert_eq!(s.len(), 1);
        let a = Action::new(4, Direction::North);
        s.get_or_create(&key(2)).update_average(&a, 3.0).unwrap();
        assert_eq!(s.get_or_create(&key(2)).value(&a), Some(3.0));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn tables_share_the_action_space() {
        let mut s = store();
        s.get_or_create(&key(1));
        s.get_or_create(&key(2));
        let a = s.get(&key(1)).unwrap().space();
        let b = s.get(&key(2)).unwrap().space();
        assert!(Arc::ptr_eq(a, b));
        assert!(Arc::ptr_eq(a, s.space()));
    }

    #[test]
    fn update_missing_prior_fails() {
        let mut s = store();
        let a = Action::new(4, Direction::North);
        assert_eq!(
            s.update(&key(1), &a, 1.0, &key(2), UpdateRule::Average),
            Err(ControllerError::MissingTable)
        );
    }

    #[test]
    fn td_update_bootstraps_from_current() {
        let mut s = store();
        let a = Action::new(4, Direction::North);
        let rule = UpdateRule::TemporalDifference {
            learning_rate: 1.0,
            discount: 0.5,
        };
        s.get_or_create(&key(1));
        s.get_or_create(&key(2)).update_average(&a, 8.0).unwrap();

        s.update(&key(1), &a, 1.0, &key(2), rule).unwrap();
        assert_eq!(s.get(&key(1)).unwrap().value(&a), Some(5.0));
    }

    #[test]
    fn td_update_within_same_state() {
        let mut s = store();
        let a = Action::new(0, Direction::East);
        let rule = UpdateRule::TemporalDifference {
            learning_rate: 0.5,
            discount: 1.0,
        };
        s.get_or_create(&key(3)).update_average(&a, 2.0).unwrap();
        s.update(&key(3), &a, 0.0, &key(3), rule).unwrap();
        // 2 + 0.5 * (0 + 1.0 * 2 - 2) = 2
        assert_eq!(s.get(&key(3)).unwrap().value(&a), Some(2.0));
    }
}
