//! PyO3 bindings for the automata engine.
//!
//! Automata cross the boundary as opaque objects; states are their string ids.

use crate::automaton::{Automaton, Dfa};
use crate::closure::closure_of;
use crate::config::EngineConfig;
use crate::epsilon_removal::remove_epsilon_transitions;
use crate::error::Error;
use crate::persist::{AutomatonDocument, dfa_to_json};
use crate::regex::regex_to_nfa_with;
use crate::render::RenderView;
use crate::simulate::simulate;
use crate::subset::to_dfa_with;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PySet;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Parse an optional JSON configuration, falling back to the defaults.
fn engine_config(config: Option<&str>) -> PyResult<EngineConfig> {
    match config {
        Some(json) => Ok(EngineConfig::from_json_str(json)?),
        None => Ok(EngineConfig::default()),
    }
}

/// A finite automaton, possibly with epsilon transitions.
#[pyclass(name = "Automaton", module = "polycompute.automaton", frozen)]
pub struct PyAutomaton {
    nfa: Automaton,
}

#[pymethods]
impl PyAutomaton {
    /// Build an NFA from a regular expression.
    #[staticmethod]
    #[pyo3(signature = (pattern, config=None))]
    fn from_regex(pattern: &str, config: Option<&str>) -> PyResult<Self> {
        let config = engine_config(config)?;
        Ok(Self {
            nfa: regex_to_nfa_with(pattern, &config)?,
        })
    }

    /// Load an automaton from a saved document.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let document = AutomatonDocument::from_json(json)?;
        Ok(Self { nfa: document.nfa })
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(AutomatonDocument::new(self.nfa.clone()).to_json()?)
    }

    #[getter]
    fn states(&self) -> Vec<String> {
        self.nfa.states.iter().map(|s| s.id.clone()).collect()
    }

    #[getter]
    fn alphabet(&self) -> Vec<String> {
        self.nfa.alphabet.iter().map(str::to_string).collect()
    }

    /// Run the automaton. Returns the verdict and the live states before the
    /// first symbol and after each consumed symbol.
    fn simulate(&self, input: &str) -> PyResult<(bool, Vec<Vec<String>>)> {
        let run = simulate(&self.nfa, input)?;
        let mut live = vec![run.initial().to_vec()];
        live.extend(run.steps().iter().map(|step| step.after.clone()));
        Ok((run.accepted(), live))
    }

    fn epsilon_closure(&self, states: Vec<String>) -> PyResult<Vec<String>> {
        Ok(closure_of(&self.nfa, states.iter().map(String::as_str))?)
    }

    #[pyo3(signature = (config=None))]
    fn to_dfa(&self, config: Option<&str>) -> PyResult<PyDfa> {
        let config = engine_config(config)?;
        Ok(PyDfa {
            dfa: to_dfa_with(&self.nfa, &config)?,
        })
    }

    fn remove_epsilon(&self) -> PyResult<PyAutomaton> {
        Ok(PyAutomaton {
            nfa: remove_epsilon_transitions(&self.nfa)?,
        })
    }

    fn to_dot(&self) -> String {
        RenderView::new(&self.nfa).to_dot()
    }

    fn __repr__(&self) -> String {
        format!(
            "Automaton(states={}, transitions={})",
            self.nfa.states.len(),
            self.nfa.transitions.len()
        )
    }
}

/// A deterministic finite automaton produced by subset construction.
#[pyclass(name = "Dfa", module = "polycompute.automaton", frozen)]
pub struct PyDfa {
    dfa: Dfa,
}

#[pymethods]
impl PyDfa {
    fn accepts(&self, input: &str) -> bool {
        self.dfa.accepts(input)
    }

    #[getter]
    fn states(&self) -> Vec<String> {
        self.dfa.states.iter().map(|s| s.id.clone()).collect()
    }

    #[getter]
    fn initial_state(&self) -> String {
        self.dfa.initial_state().to_string()
    }

    /// Get the final states as a set of state ids.
    #[getter]
    fn final_states(&self, py: Python<'_>) -> PyResult<Py<PySet>> {
        let set = PySet::empty(py)?;
        for state in self.dfa.final_states() {
            set.add(state)?;
        }
        Ok(set.unbind())
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(dfa_to_json(&self.dfa)?)
    }

    fn to_dot(&self) -> String {
        RenderView::new(&self.dfa).to_dot()
    }

    fn __repr__(&self) -> String {
        format!(
            "Dfa(states={}, initial={})",
            self.dfa.states.len(),
            self.dfa.initial_state()
        )
    }
}

/// Register the automaton submodule.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAutomaton>()?;
    m.add_class::<PyDfa>()?;
    Ok(())
}
