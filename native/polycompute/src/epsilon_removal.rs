//! Rewrite an epsilon-NFA into an equivalent NFA without epsilon transitions.

use crate::automaton::{Automaton, AutomatonGraph, StateIndex, Transition};
use crate::closure::epsilon_closure;
use crate::error::Result;
use indexmap::IndexSet;
use log::debug;

/// Remove epsilon transitions while keeping the accepted language.
///
/// For every state `p` and every non-epsilon transition `q -x-> r` leaving a
/// state `q` in the closure of `p`, the result has `p -x-> r`. A state is final
/// when its closure holds a final state. States, ids, labels, the initial flag
/// and the alphabet are kept as they are.
pub fn remove_epsilon_transitions(nfa: &Automaton) -> Result<Automaton> {
    let mut graph = AutomatonGraph::new(nfa)?;
    graph.compute_epsilon_closures();

    let mut transitions: IndexSet<Transition> = IndexSet::new();
    let mut states = nfa.states.clone();

    for (p, state) in states.iter_mut().enumerate() {
        let closure = epsilon_closure(&graph, &graph.singleton(p as StateIndex));
        state.is_final = graph.contains_final(&closure);

        for q in closure.iter() {
            let source = graph.id(q);
            for t in nfa.transitions.iter().filter(|t| t.from == source && !t.is_epsilon()) {
                transitions.insert(Transition::new(&state.id, &t.to, &t.symbol));
            }
        }
    }

    debug!(
        "epsilon removal: {} -> {} transitions",
        nfa.transitions.len(),
        transitions.len()
    );

    Ok(Automaton::new(
        states,
        transitions.into_iter().collect(),
        nfa.alphabet.clone(),
    ))
}
