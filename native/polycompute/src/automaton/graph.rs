//! Indexed view of an automaton.
//!
//! States are numbered by their position in `Automaton::states` and symbols are
//! interned, so the algorithms work on bitsets and integer keys instead of
//! string ids. The view borrows the automaton and never modifies it.

use super::state::{StateIndex, StateSet};
use super::symbol::{EPSILON_ID, SymbolId, Transition, is_epsilon};
use super::Automaton;
use crate::closure;
use crate::error::Result;
use indexmap::IndexSet;
use std::collections::HashMap;

/// An automaton compiled for the closure, simulation and subset algorithms.
#[derive(Debug, Clone)]
pub struct AutomatonGraph<'a> {
    automaton: &'a Automaton,
    /// State ids by index
    index: HashMap<&'a str, StateIndex>,
    /// Interned non-epsilon symbols; the position is the `SymbolId`
    symbols: IndexSet<&'a str>,
    /// (source, symbol) -> positions in `automaton.transitions`
    /// For epsilon transitions, symbol == EPSILON_ID
    edges: HashMap<(StateIndex, SymbolId), Vec<usize>>,
    initial: Option<StateIndex>,
    finals: StateSet,
    /// Cached epsilon closures for each state
    epsilon_closures: Option<Vec<StateSet>>,
}

impl<'a> AutomatonGraph<'a> {
    /// Validate `automaton` and build its indexed view.
    pub fn new(automaton: &'a Automaton) -> Result<Self> {
        automaton.validate()?;

        let num_states = automaton.states.len();
        let mut index = HashMap::with_capacity(num_states);
        let mut initial = None;
        let mut finals = StateSet::with_capacity(num_states);
        for (i, state) in automaton.states.iter().enumerate() {
            let i = i as StateIndex;
            index.insert(state.id.as_str(), i);
            if state.is_initial {
                initial = Some(i);
            }
            if state.is_final {
                finals.insert(i);
            }
        }

        let mut symbols = IndexSet::new();
        for symbol in automaton.alphabet.input_symbols() {
            symbols.insert(symbol);
        }

        let mut edges: HashMap<(StateIndex, SymbolId), Vec<usize>> = HashMap::new();
        for (position, t) in automaton.transitions.iter().enumerate() {
            let symbol = if is_epsilon(&t.symbol) {
                EPSILON_ID
            } else {
                symbols.insert_full(t.symbol.as_str()).0 as SymbolId
            };
            // validate() guarantees both ends exist
            let from = index[t.from.as_str()];
            edges.entry((from, symbol)).or_default().push(position);
        }

        Ok(Self {
            automaton,
            index,
            symbols,
            edges,
            initial,
            finals,
            epsilon_closures: None,
        })
    }

    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    pub fn num_states(&self) -> usize {
        self.automaton.states.len()
    }

    pub fn initial(&self) -> Option<StateIndex> {
        self.initial
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    pub fn index_of(&self, id: &str) -> Option<StateIndex> {
        self.index.get(id).copied()
    }

    pub fn id(&self, state: StateIndex) -> &'a str {
        &self.automaton.states[state as usize].id
    }

    /// State ids of a set, in creation order.
    pub fn ids(&self, set: &StateSet) -> Vec<String> {
        set.iter().map(|s| self.id(s).to_string()).collect()
    }

    /// An empty set sized for this automaton.
    pub fn empty_set(&self) -> StateSet {
        StateSet::with_capacity(self.num_states())
    }

    pub fn singleton(&self, state: StateIndex) -> StateSet {
        StateSet::singleton(state, self.num_states())
    }

    /// Interned id of an input symbol. Epsilon is never an input symbol.
    pub fn symbol_id(&self, symbol: &str) -> Option<SymbolId> {
        if is_epsilon(symbol) {
            return None;
        }
        self.symbols.get_index_of(symbol).map(|i| i as SymbolId)
    }

    /// Transitions leaving `state` on `symbol`, with their positions.
    pub fn edges(
        &self,
        state: StateIndex,
        symbol: SymbolId,
    ) -> impl Iterator<Item = (usize, &'a Transition)> + '_ {
        let automaton = self.automaton;
        self.edges
            .get(&(state, symbol))
            .into_iter()
            .flatten()
            .map(move |&position| (position, &automaton.transitions[position]))
    }

    /// Target states of the transitions leaving `state` on `symbol`.
    pub fn targets(
        &self,
        state: StateIndex,
        symbol: SymbolId,
    ) -> impl Iterator<Item = StateIndex> + '_ {
        self.edges(state, symbol).map(|(_, t)| self.index[t.to.as_str()])
    }

    pub fn contains_final(&self, set: &StateSet) -> bool {
        set.intersects(&self.finals)
    }

    /// Compute epsilon closures for all states (cached).
    pub fn compute_epsilon_closures(&mut self) {
        if self.epsilon_closures.is_some() {
            return;
        }

        let closures = (0..self.num_states() as StateIndex)
            .map(|state| closure::epsilon_closure(self, &self.singleton(state)))
            .collect();
        self.epsilon_closures = Some(closures);
    }

    pub fn has_cached_closures(&self) -> bool {
        self.epsilon_closures.is_some()
    }

    pub fn cached_closure(&self, state: StateIndex) -> Option<&StateSet> {
        self.epsilon_closures
            .as_ref()
            .and_then(|closures| closures.get(state as usize))
    }
}
