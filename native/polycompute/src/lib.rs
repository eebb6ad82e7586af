//! Finite automata engine.
//!
//! Regular expressions are parsed to postfix and turned into epsilon-NFAs by
//! Thompson construction. NFAs can be simulated step by step, stripped of
//! epsilon transitions, and determinised by subset construction. Automata
//! serialize to JSON documents and render to node/edge views or DOT.
//!
//! ```
//! use polycompute::{regex_to_nfa, simulate, to_dfa};
//!
//! let nfa = regex_to_nfa("(a|b)*a").unwrap();
//! assert!(simulate(&nfa, "aba").unwrap().accepted());
//! assert!(!to_dfa(&nfa).unwrap().accepts("ab"));
//! ```

pub mod automaton;
pub mod closure;
pub mod config;
pub mod epsilon_removal;
pub mod error;
pub mod persist;
#[cfg(feature = "python")]
mod python_bindings;
pub mod regex;
pub mod render;
pub mod simulate;
pub mod subset;

pub use automaton::{Alphabet, Automaton, AutomatonBuilder, Dfa, EPSILON, State, Transition};
pub use closure::closure_of;
pub use config::{DfaNaming, EngineConfig, RejectSink, StarShape};
pub use epsilon_removal::remove_epsilon_transitions;
pub use error::{Error, Result};
pub use persist::{AutomatonDocument, Metadata};
pub use regex::{regex_to_nfa, regex_to_nfa_with};
pub use render::{Highlight, RenderView, transition_table};
pub use simulate::{Simulation, Simulator, Step, simulate};
pub use subset::{to_dfa, to_dfa_with};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn import_submodule<'py>(
    py: Python<'py>,
    m: &Bound<'py, PyModule>,
    package: &str,
    name: &str,
    import_func: impl FnOnce(&Bound<'py, PyModule>) -> PyResult<()>,
) -> PyResult<()> {
    let submodule = PyModule::new(py, name)?;
    import_func(&submodule)?;

    // Make `import polycompute.automaton` work
    let sys_modules = PyModule::import(py, "sys")?.getattr("modules")?;
    sys_modules.set_item(format!("{package}.{name}"), submodule.clone())?;

    m.add_submodule(&submodule)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn polycompute(m: &Bound<'_, PyModule>) -> PyResult<()> {
    import_submodule(m.py(), m, "polycompute", "automaton", python_bindings::automaton)
}
