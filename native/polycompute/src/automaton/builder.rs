//! Incremental assembly of an automaton from user actions.

use super::state::State;
use super::symbol::{Alphabet, Transition, is_epsilon, is_single_char};
use super::Automaton;
use crate::error::{Error, Result};
use log::trace;

/// Working set of an automaton under construction.
///
/// Nothing here is checked against the algorithms' invariants until
/// [`AutomatonBuilder::finish`], which applies the finalization rule and then
/// full validation.
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: Vec<State>,
    transitions: Vec<Transition>,
    alphabet: Alphabet,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state named `name` (trimmed). Blank names are ignored.
    pub fn add_state(&mut self, name: &str) -> Result<&mut Self> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(self);
        }
        if self.states.iter().any(|s| s.id == name) {
            return Err(Error::DuplicateState(name.to_string()));
        }
        trace!("builder: add state {name}");
        self.states.push(State::new(name));
        Ok(self)
    }

    /// Add a transition between existing states. Non-epsilon symbols join the alphabet.
    /// A blank symbol adds nothing; a symbol longer than one character is an error.
    pub fn add_transition(&mut self, from: &str, to: &str, symbol: &str) -> Result<&mut Self> {
        for end in [from, to] {
            if !self.states.iter().any(|s| s.id == end) {
                return Err(Error::UnknownState(end.to_string()));
            }
        }
        if symbol.is_empty() {
            return Ok(self);
        }
        if !is_single_char(symbol) {
            return Err(Error::InvalidSymbol(symbol.to_string()));
        }
        if !is_epsilon(symbol) {
            self.alphabet.insert(symbol);
        }
        trace!("builder: add transition {from} -{symbol}-> {to}");
        self.transitions.push(Transition::new(from, to, symbol));
        Ok(self)
    }

    /// Add comma separated symbols, skipping blanks and symbols already present.
    /// Nothing is added when any entry is longer than one character.
    pub fn extend_alphabet(&mut self, symbols: &str) -> Result<&mut Self> {
        let symbols: Vec<&str> = symbols
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(symbol) = symbols.iter().find(|s| !is_single_char(s)) {
            return Err(Error::InvalidSymbol(symbol.to_string()));
        }
        for symbol in symbols {
            self.alphabet.insert(symbol);
        }
        Ok(self)
    }

    /// Make `id` the only initial state.
    pub fn set_initial(&mut self, id: &str) -> Result<&mut Self> {
        if !self.states.iter().any(|s| s.id == id) {
            return Err(Error::UnknownState(id.to_string()));
        }
        for state in &mut self.states {
            state.is_initial = state.id == id;
        }
        Ok(self)
    }

    /// Flip the final flag of `id`.
    pub fn toggle_final(&mut self, id: &str) -> Result<&mut Self> {
        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownState(id.to_string()))?;
        state.is_final = !state.is_final;
        Ok(self)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Whether the finalization rule holds: a state exists and one is initial.
    pub fn is_ready(&self) -> bool {
        !self.states.is_empty() && self.states.iter().any(|s| s.is_initial)
    }

    /// Assemble the automaton, or `None` while the finalization rule does not hold.
    pub fn finish(&self) -> Option<Automaton> {
        if !self.is_ready() {
            return None;
        }
        Some(Automaton::new(
            self.states.clone(),
            self.transitions.clone(),
            self.alphabet.clone(),
        ))
    }

    /// Like [`finish`](Self::finish) but reports why the automaton is not usable yet.
    pub fn build(&self) -> Result<Automaton> {
        if self.states.is_empty() {
            return Err(Error::invalid("automaton has no states"));
        }
        let automaton = self.finish().ok_or(Error::NoInitialState)?;
        automaton.validate()?;
        Ok(automaton)
    }
}
