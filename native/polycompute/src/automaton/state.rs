//! State types for automata.

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A state of an automaton as seen by callers and persisted documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Identity, unique within the owning automaton.
    pub id: String,
    /// Display label.
    pub label: String,
    pub is_initial: bool,
    pub is_final: bool,
}

impl State {
    /// A plain state whose label is its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            is_initial: false,
            is_final: false,
        }
    }

    pub fn initial(mut self, is_initial: bool) -> Self {
        self.is_initial = is_initial;
        self
    }

    pub fn accepting(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }
}

/// Dense index of a state inside one automaton (its position in `states`).
pub type StateIndex = u32;

/// A set of states implemented using a fixed-size bit set.
///
/// Iteration is in ascending index order, which is the creation order of the
/// states in the owning automaton.
#[derive(Clone)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateIndex, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state, returning `true` if it was not already present.
    pub fn insert(&mut self, state: StateIndex) -> bool {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    pub fn contains(&self, state: StateIndex) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.bits.ones().map(|i| i as StateIndex)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    pub fn is_superset(&self, other: &StateSet) -> bool {
        other.iter().all(|s| self.contains(s))
    }

    pub fn to_vec(&self) -> Vec<StateIndex> {
        self.iter().collect()
    }
}

// Two sets are equal when they hold the same states, whatever their capacity.
impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateIndex> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateIndex>>(iter: I) -> Self {
        let items: Vec<StateIndex> = iter.into_iter().collect();
        let capacity = items.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut set = Self::with_capacity(capacity);
        for state in items {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
        assert!(!set.contains(100));
    }

    #[test]
    fn test_state_set_grows_past_capacity() {
        let mut set = StateSet::with_capacity(2);
        set.insert(9);
        assert!(set.contains(9));
        assert_eq!(set.to_vec(), vec![9]);
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let small: StateSet = [1, 2].into_iter().collect();
        let mut large = StateSet::with_capacity(64);
        large.insert(2);
        large.insert(1);
        assert_eq!(small, large);
    }

    #[test]
    fn test_state_set_union() {
        let mut set1: StateSet = [1, 3].into_iter().collect();
        let set2: StateSet = [2, 3, 12].into_iter().collect();

        set1.union_with(&set2);
        assert_eq!(set1.to_vec(), vec![1, 2, 3, 12]);
        assert!(set1.is_superset(&set2));
        assert!(!set2.is_superset(&set1));
    }

    #[test]
    fn test_state_builder_methods() {
        let state = State::new("q0").initial(true).accepting(true);
        assert_eq!(state.label, "q0");
        assert!(state.is_initial);
        assert!(state.is_final);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_string(&State::new("q1").accepting(true)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"q1","label":"q1","isInitial":false,"isFinal":true}"#
        );
    }
}
