//! Subset construction: convert an epsilon-NFA into a DFA.

use crate::automaton::{
    Alphabet, Automaton, AutomatonGraph, Dfa, State, StateIndex, StateSet, Transition,
};
use crate::closure::{epsilon_closure, step};
use crate::config::{DfaNaming, EngineConfig, RejectSink};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::collections::{HashSet, VecDeque};

/// Name of the DFA state standing for the empty set of NFA states.
pub const EMPTY_SET: &str = "∅";

/// Canonical DFA state name: the NFA ids sorted and joined with `_`.
pub fn canonical_name<S: AsRef<str>>(ids: &[S]) -> String {
    if ids.is_empty() {
        return EMPTY_SET.to_string();
    }
    let mut sorted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.join("_")
}

/// Convert `nfa` into a DFA with the default configuration.
pub fn to_dfa(nfa: &Automaton) -> Result<Dfa> {
    to_dfa_with(nfa, &EngineConfig::default())
}

/// A discovered set of NFA states and the DFA state it became.
struct Discovered {
    name: String,
    members: Vec<String>,
    is_final: bool,
}

/// Sets found so far, in discovery order, plus the ones still to expand.
struct Discovery<'g, 'a> {
    graph: &'g AutomatonGraph<'a>,
    naming: DfaNaming,
    // keyed by member indices
    sets: IndexMap<Vec<StateIndex>, Discovered>,
    names: HashSet<String>,
    queue: VecDeque<(StateSet, String)>,
}

impl<'g, 'a> Discovery<'g, 'a> {
    fn new(graph: &'g AutomatonGraph<'a>, naming: DfaNaming) -> Self {
        Self {
            graph,
            naming,
            sets: IndexMap::new(),
            names: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    /// Name of `set`, queueing it for expansion the first time it is seen.
    fn intern(&mut self, set: StateSet) -> String {
        let key = set.to_vec();
        if let Some(existing) = self.sets.get(&key) {
            return existing.name.clone();
        }

        let members = self.graph.ids(&set);
        let base = match self.naming {
            DfaNaming::Canonical => canonical_name(&members[..]),
            DfaNaming::Numbered => format!("e{}", self.sets.len() + 1),
        };
        let name = self.unique(base);
        self.sets.insert(
            key,
            Discovered {
                name: name.clone(),
                members,
                is_final: self.graph.contains_final(&set),
            },
        );
        self.queue.push_back((set, name.clone()));
        name
    }

    /// `base`, or `base#2`, `base#3`, ... when a different set already took it.
    ///
    /// Joined names are ambiguous once NFA ids contain `_` or equal `∅`.
    fn unique(&mut self, base: String) -> String {
        let mut name = base.clone();
        let mut suffix = 2;
        while self.names.contains(&name) {
            name = format!("{base}#{suffix}");
            suffix += 1;
        }
        self.names.insert(name.clone());
        name
    }
}

/// Convert `nfa` into a DFA.
///
/// Sets are discovered breadth first from the closure of the initial state.
/// Every set is expanded on every input symbol in alphabet order.
pub fn to_dfa_with(nfa: &Automaton, config: &EngineConfig) -> Result<Dfa> {
    let mut graph = AutomatonGraph::new(nfa)?;
    let initial = graph.initial().ok_or(Error::NoInitialState)?;
    graph.compute_epsilon_closures();

    let symbols: Vec<(&str, _)> = nfa
        .alphabet
        .input_symbols()
        .filter_map(|symbol| graph.symbol_id(symbol).map(|id| (symbol, id)))
        .collect();

    let mut discovery = Discovery::new(&graph, config.dfa_naming);
    let mut transitions = Vec::new();

    let start = epsilon_closure(&graph, &graph.singleton(initial));
    let initial_name = discovery.intern(start);

    while let Some((current, from)) = discovery.queue.pop_front() {
        for &(symbol, id) in &symbols {
            let target = step(&graph, &current, id);
            if target.is_empty() && config.reject_sink == RejectSink::Omitted {
                continue;
            }
            let to = discovery.intern(target);
            transitions.push(Transition::new(from.as_str(), to, symbol));
        }
    }

    let states: Vec<State> = discovery
        .sets
        .values()
        .enumerate()
        .map(|(position, d)| {
            let mut state = State::new(d.name.as_str())
                .initial(position == 0)
                .accepting(d.is_final);
            if config.dfa_naming == DfaNaming::Numbered {
                state.label = if d.members.is_empty() {
                    EMPTY_SET.to_string()
                } else {
                    format!("{{{}}}", d.members.join(","))
                };
            }
            state
        })
        .collect();

    let nfa_states: IndexMap<String, Vec<String>> = discovery
        .sets
        .into_values()
        .map(|d| (d.name, d.members))
        .collect();

    let alphabet: Alphabet = symbols.iter().map(|&(symbol, _)| symbol).collect();
    debug!(
        "subset construction: {} nfa states -> {} dfa states, {} transitions",
        nfa.states.len(),
        states.len(),
        transitions.len()
    );

    let automaton = Automaton::new(states, transitions, alphabet);
    Ok(Dfa::from_parts(automaton, initial_name, nfa_states))
}
