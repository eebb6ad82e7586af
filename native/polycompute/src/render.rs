//! Drawing-agnostic views of an automaton: nodes and edges with highlighting,
//! Graphviz DOT text and the transition table.

use crate::automaton::{Automaton, EPSILON, Transition};
use crate::simulate::{Simulation, Step};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashSet;

/// States and transitions to emphasise, usually taken from a simulation trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub states: HashSet<String>,
    pub transitions: HashSet<Transition>,
}

impl Highlight {
    /// The live states after `step` and the transitions it took.
    pub fn from_step(step: &Step) -> Self {
        Self {
            states: step.after.iter().cloned().collect(),
            transitions: step.taken.iter().cloned().collect(),
        }
    }

    /// The live states before the first symbol of a run.
    pub fn initial(simulation: &Simulation) -> Self {
        Self {
            states: simulation.initial().iter().cloned().collect(),
            transitions: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub initial: bool,
    #[serde(rename = "final")]
    pub is_final: bool,
    pub active: bool,
}

/// All transitions between one ordered pair of states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Symbols joined with `, `.
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderView {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl RenderView {
    pub fn new(automaton: &Automaton) -> Self {
        Self::highlighted(automaton, &Highlight::default())
    }

    pub fn highlighted(automaton: &Automaton, highlight: &Highlight) -> Self {
        let nodes = automaton
            .states
            .iter()
            .map(|s| Node {
                id: s.id.clone(),
                label: s.label.clone(),
                initial: s.is_initial,
                is_final: s.is_final,
                active: highlight.states.contains(&s.id),
            })
            .collect();

        let mut grouped: IndexMap<(&str, &str), (IndexSet<&str>, bool)> = IndexMap::new();
        for t in &automaton.transitions {
            let (symbols, active) = grouped
                .entry((t.from.as_str(), t.to.as_str()))
                .or_default();
            symbols.insert(t.symbol.as_str());
            *active |= highlight.transitions.contains(t);
        }

        let edges = grouped
            .into_iter()
            .map(|((from, to), (symbols, active))| Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: symbols.into_iter().collect::<Vec<_>>().join(", "),
                active,
            })
            .collect();

        Self { nodes, edges }
    }

    /// Graphviz DOT source, left to right, final states double circled.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph automaton {\n    rankdir=LR;\n");
        dot.push_str("    __start [label=\"\" shape=none width=0 height=0];\n");

        for node in &self.nodes {
            let shape = if node.is_final { "doublecircle" } else { "circle" };
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\" shape={shape}",
                escape(&node.id),
                escape(&node.label)
            ));
            if node.active {
                dot.push_str(" style=filled fillcolor=\"#fde68a\"");
            }
            dot.push_str("];\n");
        }

        for node in self.nodes.iter().filter(|n| n.initial) {
            dot.push_str(&format!("    __start -> \"{}\";\n", escape(&node.id)));
        }

        for edge in &self.edges {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"",
                escape(&edge.from),
                escape(&edge.to),
                escape(&edge.label)
            ));
            if edge.active {
                dot.push_str(" color=\"#d97706\" penwidth=2");
            }
            dot.push_str("];\n");
        }

        dot.push_str("}\n");
        dot
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// One line of a transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub state: String,
    pub symbol: String,
    pub next: Vec<String>,
}

/// For every state and every alphabet symbol followed by `ε`, the labels of
/// the target states. Pairs without targets are left out.
pub fn transition_table(automaton: &Automaton) -> Vec<TableRow> {
    let symbols: Vec<&str> = automaton
        .alphabet
        .input_symbols()
        .chain(std::iter::once(EPSILON))
        .collect();

    let mut rows = Vec::new();
    for state in &automaton.states {
        for &symbol in &symbols {
            let next: Vec<String> = automaton
                .transitions
                .iter()
                .filter(|t| t.from == state.id && t.symbol == symbol)
                .map(|t| {
                    automaton
                        .state(&t.to)
                        .map_or_else(|| t.to.clone(), |s| s.label.clone())
                })
                .collect();
            if !next.is_empty() {
                rows.push(TableRow {
                    state: state.label.clone(),
                    symbol: symbol.to_string(),
                    next,
                });
            }
        }
    }
    rows
}
