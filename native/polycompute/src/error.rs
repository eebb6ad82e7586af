//! Error type for the automata engine.

use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The regular expression could not be parsed or assembled into a single fragment.
    #[error("malformed pattern at position {position}: {reason}")]
    MalformedPattern {
        /// Character position the problem was detected at.
        position: usize,
        /// What went wrong.
        reason: String,
    },
    /// Simulation or subset construction on an automaton without an initial state.
    #[error("automaton has no initial state")]
    NoInitialState,
    /// A supplied automaton failed structural validation.
    #[error("invalid automaton: {0}")]
    InvalidPersistedAutomaton(String),
    /// A state with this id already exists.
    #[error("state `{0}` already exists")]
    DuplicateState(String),
    /// A state id that does not exist in the automaton.
    #[error("unknown state `{0}`")]
    UnknownState(String),
    /// Symbols are single characters, since inputs are consumed one character at a time.
    #[error("symbol `{0}` is not a single character")]
    InvalidSymbol(String),
    /// Serialized document could not be read or written.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPersistedAutomaton(reason.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
