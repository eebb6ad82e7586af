//! Regular expression to NFA conversion.
//!
//! `parser` turns a pattern into postfix tokens, `thompson` turns postfix
//! tokens into an epsilon-NFA. [`regex_to_nfa`] runs both.

pub mod parser;
pub mod thompson;

pub use parser::{Spanned, Token, check_symbols, parse, postfix_string};
pub use thompson::{StateIdAllocator, build, build_with, build_with_allocator};

use crate::automaton::Automaton;
use crate::config::EngineConfig;
use crate::epsilon_removal::remove_epsilon_transitions;
use crate::error::Result;
use log::debug;

/// Convert a pattern into an NFA with the default configuration.
pub fn regex_to_nfa(pattern: &str) -> Result<Automaton> {
    regex_to_nfa_with(pattern, &EngineConfig::default())
}

/// Convert a pattern into an NFA.
///
/// State ids restart at zero on every call, so the same pattern and
/// configuration always produce the same automaton.
pub fn regex_to_nfa_with(pattern: &str, config: &EngineConfig) -> Result<Automaton> {
    let postfix = parse(pattern)?;
    debug!("regex {pattern:?}: postfix {}", postfix_string(&postfix));

    let nfa = build_with(&postfix, config)?;
    debug!(
        "regex {pattern:?}: {} states, {} transitions",
        nfa.states.len(),
        nfa.transitions.len()
    );

    if config.strip_epsilon {
        return remove_epsilon_transitions(&nfa);
    }
    Ok(nfa)
}
