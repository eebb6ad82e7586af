//! Step-by-step NFA simulation.
//!
//! A run keeps a live set of states, starting at the epsilon closure of the
//! initial state. Each input symbol moves the live set and closes the result.
//! An empty live set halts the run and rejects.

use crate::automaton::{Automaton, AutomatonGraph, StateSet, Transition, split_input};
use crate::closure::{epsilon_closure, move_on_symbol};
use crate::error::{Error, Result};
use log::{debug, trace};
use serde::Serialize;

/// One consumed input symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub symbol: String,
    /// Live states before the symbol, closed under epsilon.
    pub before: Vec<String>,
    /// Transitions on `symbol` leaving a state of `before`.
    pub taken: Vec<Transition>,
    /// Live states after the symbol, closed under epsilon.
    pub after: Vec<String>,
}

/// Full trace and verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    input: Vec<String>,
    initial: Vec<String>,
    steps: Vec<Step>,
    accepted: bool,
    halted_at: Option<usize>,
}

impl Simulation {
    /// Symbols the input was split into.
    pub fn input(&self) -> &[String] {
        &self.input
    }

    /// Closure of the initial state.
    pub fn initial(&self) -> &[String] {
        &self.initial
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn halted(&self) -> bool {
        self.halted_at.is_some()
    }

    /// Position of the input symbol that emptied the live set.
    pub fn halted_at(&self) -> Option<usize> {
        self.halted_at
    }

    /// Number of input symbols consumed before the run ended.
    pub fn consumed(&self) -> usize {
        self.steps.len()
    }

    /// Live states once the run ended.
    pub fn final_live(&self) -> &[String] {
        self.steps.last().map_or(&self.initial, |step| &step.after)
    }
}

/// Incremental driver for a single run, one symbol at a time.
#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    graph: AutomatonGraph<'a>,
    live: StateSet,
    halted: bool,
}

impl<'a> Simulator<'a> {
    /// Start a run on `nfa`. The live set is the closure of the initial state.
    pub fn new(nfa: &'a Automaton) -> Result<Self> {
        let graph = AutomatonGraph::new(nfa)?;
        let initial = graph.initial().ok_or(Error::NoInitialState)?;
        let live = epsilon_closure(&graph, &graph.singleton(initial));
        Ok(Self {
            graph,
            live,
            halted: false,
        })
    }

    /// Current live state ids in creation order.
    pub fn live(&self) -> Vec<String> {
        self.graph.ids(&self.live)
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether the live set holds a final state.
    pub fn is_accepting(&self) -> bool {
        !self.halted && self.graph.contains_final(&self.live)
    }

    /// Consume `symbol`. Returns `None` once the run has halted.
    ///
    /// A symbol that is not an input symbol of the automaton has no
    /// transitions, so it empties the live set and halts the run.
    pub fn step(&mut self, symbol: &str) -> Option<Step> {
        if self.halted {
            return None;
        }

        let before = self.graph.ids(&self.live);
        let (taken, after) = match self.graph.symbol_id(symbol) {
            Some(id) => {
                let taken = self
                    .live
                    .iter()
                    .flat_map(|state| self.graph.edges(state, id))
                    .map(|(_, t)| t.clone())
                    .collect();
                let moved = move_on_symbol(&self.graph, &self.live, id);
                (taken, epsilon_closure(&self.graph, &moved))
            }
            None => (Vec::new(), self.graph.empty_set()),
        };

        self.halted = after.is_empty();
        self.live = after;
        let after = self.graph.ids(&self.live);
        trace!("simulate: {before:?} -{symbol}-> {after:?}");

        Some(Step {
            symbol: symbol.to_string(),
            before,
            taken,
            after,
        })
    }
}

/// Run `nfa` over `input` and record every step.
pub fn simulate(nfa: &Automaton, input: &str) -> Result<Simulation> {
    let mut simulator = Simulator::new(nfa)?;
    let input = split_input(input);
    let initial = simulator.live();

    let mut steps = Vec::with_capacity(input.len());
    let mut halted_at = None;
    for (position, symbol) in input.iter().enumerate() {
        let Some(step) = simulator.step(symbol) else {
            break;
        };
        steps.push(step);
        if simulator.is_halted() {
            halted_at = Some(position);
            break;
        }
    }

    let accepted = simulator.is_accepting();
    debug!(
        "simulate: {} of {} symbols consumed, {}",
        steps.len(),
        input.len(),
        if accepted { "accepted" } else { "rejected" }
    );

    Ok(Simulation {
        input,
        initial,
        steps,
        accepted,
        halted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::State;
    use crate::regex::regex_to_nfa;

    #[test]
    fn test_single_symbol() {
        let nfa = regex_to_nfa("a").unwrap();
        let run = simulate(&nfa, "a").unwrap();
        assert!(run.accepted());
        assert_eq!(run.initial(), ["q0"]);
        assert_eq!(run.steps()[0].after, ["q1"]);
        assert_eq!(run.steps()[0].taken, vec![Transition::new("q0", "q1", "a")]);

        assert!(!simulate(&nfa, "").unwrap().accepted());
        assert!(!simulate(&nfa, "aa").unwrap().accepted());
    }

    #[test]
    fn test_union() {
        let nfa = regex_to_nfa("a|b").unwrap();
        let run = simulate(&nfa, "b").unwrap();
        assert!(run.accepted());
        assert_eq!(run.initial(), ["q4", "q0", "q2"]);
        assert_eq!(run.steps()[0].after, ["q3", "q5"]);
    }

    #[test]
    fn test_star_accepts_empty_input() {
        let nfa = regex_to_nfa("a*").unwrap();
        let run = simulate(&nfa, "").unwrap();
        assert!(run.accepted());
        assert!(run.steps().is_empty());
        assert!(simulate(&nfa, "ε").unwrap().accepted());
        assert!(simulate(&nfa, "aaa").unwrap().accepted());
    }

    #[test]
    fn test_halts_on_empty_live_set() {
        let nfa = regex_to_nfa("(a|b)*a").unwrap();
        assert!(simulate(&nfa, "aba").unwrap().accepted());
        assert!(!simulate(&nfa, "ab").unwrap().accepted());

        let run = simulate(&nfa, "acab").unwrap();
        assert!(!run.accepted());
        assert!(run.halted());
        assert_eq!(run.halted_at(), Some(1));
        assert_eq!(run.consumed(), 2);
        assert!(run.final_live().is_empty());
    }

    #[test]
    fn test_reject_without_halting() {
        let nfa = regex_to_nfa("ab").unwrap();
        let run = simulate(&nfa, "a").unwrap();
        assert!(!run.accepted());
        assert!(!run.halted());
        assert_eq!(run.consumed(), 1);
    }

    #[test]
    fn test_no_initial_state() {
        let nfa = Automaton::new(
            vec![State::new("p").accepting(true)],
            Vec::new(),
            ["a"].into_iter().collect(),
        );
        assert!(matches!(simulate(&nfa, "a"), Err(Error::NoInitialState)));
    }

    #[test]
    fn test_stepwise_driver() {
        let nfa = regex_to_nfa("ab").unwrap();
        let mut simulator = Simulator::new(&nfa).unwrap();
        assert!(!simulator.is_accepting());

        simulator.step("a").unwrap();
        assert!(!simulator.is_accepting());
        simulator.step("b").unwrap();
        assert!(simulator.is_accepting());

        let step = simulator.step("b").unwrap();
        assert!(step.after.is_empty());
        assert!(simulator.is_halted());
        assert!(simulator.step("a").is_none());
        assert!(!simulator.is_accepting());
    }
}
