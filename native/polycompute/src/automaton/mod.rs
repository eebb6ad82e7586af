//! Automaton model shared by every algorithm of the engine.
//!
//! This module provides:
//! - `State`, `Transition` and `Alphabet`, the persisted building blocks
//! - `Automaton`, the immutable value every algorithm consumes and produces
//! - `Dfa`, an `Automaton` with explicit initial/final fields
//! - structural validation and the finalization rule
//! - the indexed graph view (`AutomatonGraph`, `StateSet`) the algorithms run on

mod builder;
mod graph;
mod state;
mod symbol;

pub use builder::AutomatonBuilder;
pub use graph::AutomatonGraph;
pub use state::{State, StateIndex, StateSet};
pub use symbol::{
    Alphabet, EPSILON, EPSILON_ID, SymbolId, Transition, is_epsilon, is_single_char, split_input,
};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Deref;

/// A finite automaton: states in creation order, transitions, alphabet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton {
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub alphabet: Alphabet,
}

impl Automaton {
    pub fn new(states: Vec<State>, transitions: Vec<Transition>, alphabet: Alphabet) -> Self {
        Self {
            states,
            transitions,
            alphabet,
        }
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// The first state flagged initial.
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn final_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter().filter(|s| s.is_final)
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// The finalization rule: at least one state and a designated initial state.
    pub fn is_constructible(&self) -> bool {
        !self.states.is_empty() && self.initial_state().is_some()
    }

    /// Check the structural invariants every algorithm relies on.
    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::invalid("automaton has no states"));
        }

        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(Error::invalid(format!("duplicate state id `{}`", state.id)));
            }
        }

        let initial = self.states.iter().filter(|s| s.is_initial).count();
        if initial > 1 {
            return Err(Error::invalid(format!(
                "{initial} states are flagged initial, at most one is allowed"
            )));
        }

        if let Some(symbol) = self.alphabet.iter().find(|s| !is_single_char(s)) {
            return Err(Error::invalid(format!(
                "alphabet symbol `{symbol}` is not a single character"
            )));
        }

        for t in &self.transitions {
            for end in [&t.from, &t.to] {
                if !ids.contains(end.as_str()) {
                    return Err(Error::invalid(format!(
                        "transition {} -{}-> {} references unknown state `{end}`",
                        t.from, t.symbol, t.to
                    )));
                }
            }
            if !is_single_char(&t.symbol) {
                return Err(Error::invalid(format!(
                    "transition {} -> {} has symbol `{}`, expected a single character",
                    t.from, t.to, t.symbol
                )));
            }
            if !t.is_epsilon() && !self.alphabet.contains(&t.symbol) {
                return Err(Error::invalid(format!(
                    "transition {} -{}-> {} uses a symbol outside the alphabet",
                    t.from, t.symbol, t.to
                )));
            }
        }

        Ok(())
    }
}

/// A deterministic automaton.
///
/// `initial_state` and `final_states` duplicate the flags on the states; they
/// are kept because DFA consumers expect flat id lists. `nfa_states` maps each
/// DFA state to the NFA states it was built from, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dfa {
    #[serde(flatten)]
    automaton: Automaton,
    initial_state: String,
    final_states: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    nfa_states: IndexMap<String, Vec<String>>,
}

impl Dfa {
    pub(crate) fn from_parts(
        automaton: Automaton,
        initial_state: String,
        nfa_states: IndexMap<String, Vec<String>>,
    ) -> Self {
        let final_states = automaton.final_states().map(|s| s.id.clone()).collect();
        Self {
            automaton,
            initial_state,
            final_states,
            nfa_states,
        }
    }

    /// Wrap an automaton as a DFA after checking it is deterministic.
    pub fn from_automaton(automaton: Automaton) -> Result<Self> {
        let initial = automaton
            .initial_state()
            .map(|s| s.id.clone())
            .ok_or(Error::NoInitialState)?;
        let dfa = Self::from_parts(automaton, initial, IndexMap::new());
        dfa.validate()?;
        Ok(dfa)
    }

    /// Validate the base automaton plus the determinism invariants.
    pub fn validate(&self) -> Result<()> {
        self.automaton.validate()?;

        if self.automaton.alphabet.contains(EPSILON) {
            return Err(Error::invalid("dfa alphabet contains epsilon"));
        }

        let mut seen = HashSet::new();
        for t in &self.automaton.transitions {
            if t.is_epsilon() {
                return Err(Error::invalid(format!(
                    "dfa has an epsilon transition {} -> {}",
                    t.from, t.to
                )));
            }
            if !seen.insert((t.from.as_str(), t.symbol.as_str())) {
                return Err(Error::invalid(format!(
                    "dfa state `{}` has more than one transition on `{}`",
                    t.from, t.symbol
                )));
            }
        }

        match self.automaton.initial_state() {
            Some(s) if s.id == self.initial_state => {}
            _ => {
                return Err(Error::invalid(format!(
                    "initial state `{}` does not match the flagged initial state",
                    self.initial_state
                )));
            }
        }

        let flagged: HashSet<&str> = self.automaton.final_states().map(|s| s.id.as_str()).collect();
        let listed: HashSet<&str> = self.final_states.iter().map(String::as_str).collect();
        if flagged != listed {
            return Err(Error::invalid("final states do not match the flagged final states"));
        }

        Ok(())
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn final_states(&self) -> &[String] {
        &self.final_states
    }

    /// The NFA states a DFA state stands for, if this DFA came from subset construction.
    pub fn nfa_states(&self, state: &str) -> Option<&[String]> {
        self.nfa_states.get(state).map(Vec::as_slice)
    }

    /// The target of the transition leaving `state` on `symbol`.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        self.automaton
            .transitions
            .iter()
            .find(|t| t.from == state && t.symbol == symbol)
            .map(|t| t.to.as_str())
    }

    /// Run the DFA over `input`. A missing transition rejects.
    pub fn accepts(&self, input: &str) -> bool {
        let table: HashMap<(&str, &str), &str> = self
            .automaton
            .transitions
            .iter()
            .map(|t| ((t.from.as_str(), t.symbol.as_str()), t.to.as_str()))
            .collect();

        let mut current = self.initial_state.as_str();
        for symbol in split_input(input) {
            match table.get(&(current, symbol.as_str())) {
                Some(&next) => current = next,
                None => return false,
            }
        }
        self.final_states.iter().any(|f| f == current)
    }
}

impl Deref for Dfa {
    type Target = Automaton;

    fn deref(&self) -> &Automaton {
        &self.automaton
    }
}
