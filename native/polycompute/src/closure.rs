//! Epsilon closure and symbol moves over state sets.

use crate::automaton::{Automaton, AutomatonGraph, EPSILON_ID, StateSet, SymbolId};
use crate::error::{Error, Result};

/// The set of states reachable from `states` through epsilon transitions only,
/// including `states` themselves.
///
/// Uses the per-state cache when `compute_epsilon_closures` has been called,
/// otherwise traverses with an explicit stack.
pub fn epsilon_closure(graph: &AutomatonGraph<'_>, states: &StateSet) -> StateSet {
    let mut closure = graph.empty_set();

    if graph.has_cached_closures() {
        for state in states.iter() {
            if let Some(cached) = graph.cached_closure(state) {
                closure.union_with(cached);
            }
        }
        return closure;
    }

    let mut stack: Vec<_> = states.iter().collect();
    while let Some(s) = stack.pop() {
        if !closure.insert(s) {
            continue;
        }
        for dest in graph.targets(s, EPSILON_ID) {
            if !closure.contains(dest) {
                stack.push(dest);
            }
        }
    }

    closure
}

/// States reached from `states` by one transition on `symbol`. No closure is taken.
pub fn move_on_symbol(graph: &AutomatonGraph<'_>, states: &StateSet, symbol: SymbolId) -> StateSet {
    assert_ne!(symbol, EPSILON_ID, "use epsilon_closure for epsilon moves");

    let mut reached = graph.empty_set();
    for state in states.iter() {
        for dest in graph.targets(state, symbol) {
            reached.insert(dest);
        }
    }
    reached
}

/// Closure of `move_on_symbol`, the successor set used by simulation and subset construction.
pub fn step(graph: &AutomatonGraph<'_>, states: &StateSet, symbol: SymbolId) -> StateSet {
    epsilon_closure(graph, &move_on_symbol(graph, states, symbol))
}

/// Epsilon closure of a set of state ids, returned in creation order.
pub fn closure_of<'s>(
    automaton: &Automaton,
    ids: impl IntoIterator<Item = &'s str>,
) -> Result<Vec<String>> {
    let graph = AutomatonGraph::new(automaton)?;
    let mut start = graph.empty_set();
    for id in ids {
        let state = graph
            .index_of(id)
            .ok_or_else(|| Error::UnknownState(id.to_string()))?;
        start.insert(state);
    }
    Ok(graph.ids(&epsilon_closure(&graph, &start)))
}
