//! Tabular action-value storage

use std::collections::{BTreeMap, HashMap};

use super::observation::StateKey;
use crate::game::Action;

/// Action values for one state, indexed by [`Action::index`]
pub type ActionValues = [f64; Action::COUNT];

/// Mapping from discretized state to the value of each action
///
/// Unknown states read as all zeros. Reads never insert; the first write to
/// a state creates its entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<StateKey, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `state`, or zeros if it has never been written
    pub fn get(&self, state: &StateKey) -> ActionValues {
        self.values
            .get(state)
            .copied()
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Mutable values for `state`, inserting zeros on first access
    pub fn get_mut(&mut self, state: StateKey) -> &mut ActionValues {
        self.values.entry(state).or_insert([0.0; Action::COUNT])
    }

    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.get(state)[action.index()]
    }

    /// Highest action value for `state`
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.get(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest value; ties go to the lowest index (`Idle`)
    pub fn best_action(&self, state: &StateKey) -> Action {
        let values = self.get(state);
        let mut best = Action::ALL[0];
        for action in Action::ALL.into_iter().skip(1) {
            if values[action.index()] > values[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Insert or overwrite every entry of `other`
    pub fn merge(&mut self, other: QTable) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.values.iter()
    }

    /// Entries ordered by key, for stable output
    pub fn to_sorted(&self) -> BTreeMap<StateKey, ActionValues> {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

impl FromIterator<(StateKey, ActionValues)> for QTable {
    fn from_iter<I: IntoIterator<Item = (StateKey, ActionValues)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(dy: i32) -> StateKey {
        StateKey::new(dy, 0, 400)
    }

    #[test]
    fn test_unknown_state_reads_zero() {
        let table = QTable::new();
        assert_eq!(table.get(&key(5)), [0.0, 0.0]);
        assert_eq!(table.max_value(&key(5)), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_mut_inserts_lazily() {
        let mut table = QTable::new();
        table.get_mut(key(5))[1] = 2.5;

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key(5)), [0.0, 2.5]);
        assert_eq!(table.value(&key(5), Action::Jump), 2.5);
    }

    #[test]
    fn test_best_action() {
        let mut table = QTable::new();
        *table.get_mut(key(1)) = [1.0, 3.0];
        *table.get_mut(key(2)) = [4.0, -3.0];
        *table.get_mut(key(3)) = [-2.0, -2.0];

        assert_eq!(table.best_action(&key(1)), Action::Jump);
        assert_eq!(table.best_action(&key(2)), Action::Idle);
        // Ties prefer Idle
        assert_eq!(table.best_action(&key(3)), Action::Idle);
        assert_eq!(table.best_action(&key(99)), Action::Idle);
    }

    #[test]
    fn test_max_value_negative() {
        let mut table = QTable::new();
        *table.get_mut(key(1)) = [-10.0, -4.0];
        assert_eq!(table.max_value(&key(1)), -4.0);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut table: QTable = [(key(1), [1.0, 1.0]), (key(2), [2.0, 2.0])]
            .into_iter()
            .collect();
        let loaded: QTable = [(key(2), [5.0, 6.0]), (key(3), [7.0, 8.0])]
            .into_iter()
            .collect();

        table.merge(loaded);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&key(1)), [1.0, 1.0]);
        assert_eq!(table.get(&key(2)), [5.0, 6.0]);
        assert_eq!(table.get(&key(3)), [7.0, 8.0]);
    }

    #[test]
    fn test_sorted_entries() {
        let table: QTable = [(key(30), [0.0, 0.0]), (key(-10), [0.0, 0.0]), (key(5), [0.0, 0.0])]
            .into_iter()
            .collect();

        let dys: Vec<i32> = table.to_sorted().keys().map(|k| k.dy).collect();
        assert_eq!(dys, vec![-10, 5, 30]);
    }
}
