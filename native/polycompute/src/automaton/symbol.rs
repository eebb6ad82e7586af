//! Symbols, transitions and alphabets.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The reserved epsilon symbol as it appears in transitions and documents.
pub const EPSILON: &str = "ε";

/// Check if a symbol is the epsilon symbol.
#[inline]
pub fn is_epsilon(symbol: &str) -> bool {
    symbol == EPSILON
}

/// Whether `symbol` can label a transition: exactly one character.
pub fn is_single_char(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Split an input string into the symbols a run consumes, one per character.
/// An input consisting of the epsilon symbol alone is the empty input.
pub fn split_input(input: &str) -> Vec<String> {
    if is_epsilon(input) {
        return Vec::new();
    }
    input.chars().map(String::from).collect()
}

/// Interned symbol identifier used by the graph view.
pub type SymbolId = u32;

/// Special symbol id representing epsilon transitions.
pub const EPSILON_ID: SymbolId = u32::MAX;

/// A labelled edge `from -symbol-> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub symbol: String,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            symbol: symbol.into(),
        }
    }

    pub fn epsilon(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, EPSILON)
    }

    pub fn is_epsilon(&self) -> bool {
        is_epsilon(&self.symbol)
    }
}

/// Input symbols of an automaton, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alphabet(IndexSet<String>);

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol, returning `true` if it was new.
    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.0.insert(symbol.into())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Input symbols, i.e. every member except epsilon, in order.
    pub fn input_symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().filter(|s| !is_epsilon(s))
    }

    /// Append the members of `other` that are not present yet.
    pub fn extend_from(&mut self, other: &Alphabet) {
        for symbol in other.iter() {
            if !self.0.contains(symbol) {
                self.0.insert(symbol.to_string());
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Alphabet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
