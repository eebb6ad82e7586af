//! Thompson construction over postfix tokens.
//!
//! Each operand on the stack is a fragment: an automaton with exactly one
//! initial and one final state whose states are all fresh. Operators pop their
//! operands and push the combined fragment; a well-formed pattern leaves
//! exactly one fragment behind.

use super::parser::{Spanned, Token};
use crate::automaton::{Alphabet, Automaton, State, Transition, is_epsilon};
use crate::config::{EngineConfig, StarShape};
use crate::error::{Error, Result};
use log::trace;

/// Source of fresh state ids (`q0`, `q1`, ...) for one conversion.
///
/// The allocator is a plain value owned by the caller, so every conversion
/// numbers its states independently and reproducibly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateIdAllocator {
    prefix: String,
    next: u64,
}

impl StateIdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Continue numbering after the largest `<prefix><n>` id in `automaton`.
    ///
    /// Numbers at or above `u32::MAX` are not ones this allocator hands out
    /// and are skipped, which keeps the counter far from overflowing.
    pub fn resuming_after(automaton: &Automaton, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let next = automaton
            .states
            .iter()
            .filter_map(|s| s.id.strip_prefix(prefix.as_str())?.parse::<u64>().ok())
            .filter(|&n| n < u64::from(u32::MAX))
            .max()
            .map_or(0, |n| n + 1);
        Self { prefix, next }
    }

    /// The number the next id will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// An automaton under construction with its single entry and exit.
#[derive(Debug)]
struct Fragment {
    states: Vec<State>,
    transitions: Vec<Transition>,
    alphabet: Alphabet,
    initial: String,
    accept: String,
}

impl Fragment {
    /// The states of this fragment with their initial and final flags cleared.
    fn plain_states(&mut self) -> Vec<State> {
        std::mem::take(&mut self.states)
            .into_iter()
            .map(|s| s.initial(false).accepting(false))
            .collect()
    }

    fn set_initial(&mut self, id: &str, flag: bool) {
        if let Some(state) = self.states.iter_mut().find(|s| s.id == id) {
            state.is_initial = flag;
        }
    }

    fn set_final(&mut self, id: &str, flag: bool) {
        if let Some(state) = self.states.iter_mut().find(|s| s.id == id) {
            state.is_final = flag;
        }
    }

    fn into_automaton(self) -> Automaton {
        Automaton::new(self.states, self.transitions, self.alphabet)
    }
}

struct Thompson {
    ids: StateIdAllocator,
    star_shape: StarShape,
}

impl Thompson {
    /// `s0 -symbol-> s1`, or a single initial and final state for epsilon.
    fn literal(&mut self, symbol: &str) -> Fragment {
        if is_epsilon(symbol) {
            let s = self.ids.next_id();
            return Fragment {
                states: vec![State::new(&s).initial(true).accepting(true)],
                transitions: Vec::new(),
                alphabet: Alphabet::new(),
                initial: s.clone(),
                accept: s,
            };
        }

        let s0 = self.ids.next_id();
        let s1 = self.ids.next_id();
        Fragment {
            states: vec![State::new(&s0).initial(true), State::new(&s1).accepting(true)],
            transitions: vec![Transition::new(&s0, &s1, symbol)],
            alphabet: [symbol].into_iter().collect(),
            initial: s0,
            accept: s1,
        }
    }

    fn concat(&mut self, mut left: Fragment, mut right: Fragment) -> Fragment {
        let left_accept = left.accept.clone();
        left.set_final(&left_accept, false);
        let right_initial = right.initial.clone();
        right.set_initial(&right_initial, false);

        let mut states = left.states;
        states.extend(right.states);
        let mut transitions = left.transitions;
        transitions.extend(right.transitions);
        transitions.push(Transition::epsilon(&left_accept, &right_initial));
        left.alphabet.extend_from(&right.alphabet);

        Fragment {
            states,
            transitions,
            alphabet: left.alphabet,
            initial: left.initial,
            accept: right.accept,
        }
    }

    fn union(&mut self, mut left: Fragment, mut right: Fragment) -> Fragment {
        let start = self.ids.next_id();
        let end = self.ids.next_id();

        let mut states = vec![State::new(&start).initial(true)];
        states.extend(left.plain_states());
        states.extend(right.plain_states());
        states.push(State::new(&end).accepting(true));

        let mut transitions = vec![
            Transition::epsilon(&start, &left.initial),
            Transition::epsilon(&start, &right.initial),
        ];
        transitions.append(&mut left.transitions);
        transitions.append(&mut right.transitions);
        transitions.push(Transition::epsilon(&left.accept, &end));
        transitions.push(Transition::epsilon(&right.accept, &end));

        left.alphabet.extend_from(&right.alphabet);
        Fragment {
            states,
            transitions,
            alphabet: left.alphabet,
            initial: start,
            accept: end,
        }
    }

    fn star(&mut self, mut operand: Fragment) -> Fragment {
        match self.star_shape {
            StarShape::Separate => {
                let start = self.ids.next_id();
                let end = self.ids.next_id();

                let mut states = vec![State::new(&start).initial(true)];
                states.extend(operand.plain_states());
                states.push(State::new(&end).accepting(true));

                let mut transitions = vec![
                    Transition::epsilon(&start, &operand.initial),
                    Transition::epsilon(&start, &end),
                ];
                transitions.append(&mut operand.transitions);
                transitions.push(Transition::epsilon(&operand.accept, &operand.initial));
                transitions.push(Transition::epsilon(&operand.accept, &end));

                Fragment {
                    states,
                    transitions,
                    alphabet: operand.alphabet,
                    initial: start,
                    accept: end,
                }
            }
            StarShape::Collapsed => {
                let hub = self.ids.next_id();

                let mut states = vec![State::new(&hub).initial(true).accepting(true)];
                states.extend(operand.plain_states());

                let mut transitions = vec![Transition::epsilon(&hub, &operand.initial)];
                transitions.append(&mut operand.transitions);
                transitions.push(Transition::epsilon(&operand.accept, &hub));

                Fragment {
                    states,
                    transitions,
                    alphabet: operand.alphabet,
                    initial: hub.clone(),
                    accept: hub,
                }
            }
        }
    }

    fn run(&mut self, postfix: &[Spanned]) -> Result<Fragment> {
        let mut stack: Vec<Fragment> = Vec::new();

        for spanned in postfix {
            let position = spanned.position;
            let fragment = match &spanned.token {
                Token::Symbol(symbol) => self.literal(symbol),
                Token::Star => {
                    let operand =
                        pop(&mut stack, position, "insufficient operand for Kleene star")?;
                    self.star(operand)
                }
                Token::Union => {
                    let right = pop(&mut stack, position, "insufficient operands for union")?;
                    let left = pop(&mut stack, position, "insufficient operands for union")?;
                    self.union(left, right)
                }
                Token::Concat => {
                    let right =
                        pop(&mut stack, position, "insufficient operands for concatenation")?;
                    let left =
                        pop(&mut stack, position, "insufficient operands for concatenation")?;
                    self.concat(left, right)
                }
                Token::LParen | Token::RParen => {
                    return Err(Error::malformed(position, "parenthesis in postfix input"));
                }
            };
            trace!(
                "thompson: `{}` -> fragment {} -> {} ({} states)",
                spanned.token,
                fragment.initial,
                fragment.accept,
                fragment.states.len()
            );
            stack.push(fragment);
        }

        let result = stack
            .pop()
            .ok_or_else(|| Error::malformed(0, "pattern produced no fragment"))?;
        if !stack.is_empty() {
            return Err(Error::malformed(
                0,
                format!("{} fragments left after construction", stack.len() + 1),
            ));
        }
        Ok(result)
    }
}

fn pop(stack: &mut Vec<Fragment>, position: usize, reason: &str) -> Result<Fragment> {
    stack.pop().ok_or_else(|| Error::malformed(position, reason))
}

/// Build an NFA from postfix tokens with the default configuration.
pub fn build(postfix: &[Spanned]) -> Result<Automaton> {
    build_with(postfix, &EngineConfig::default())
}

/// Build an NFA from postfix tokens, numbering states from zero.
pub fn build_with(postfix: &[Spanned], config: &EngineConfig) -> Result<Automaton> {
    let ids = StateIdAllocator::new(config.state_prefix.as_str());
    build_with_allocator(postfix, config, ids).map(|(nfa, _)| nfa)
}

/// Build an NFA drawing ids from `ids`, handing the advanced allocator back.
pub fn build_with_allocator(
    postfix: &[Spanned],
    config: &EngineConfig,
    ids: StateIdAllocator,
) -> Result<(Automaton, StateIdAllocator)> {
    let mut thompson = Thompson {
        ids,
        star_shape: config.star_shape,
    };
    let fragment = thompson.run(postfix)?;
    Ok((fragment.into_automaton(), thompson.ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::parser::parse;

    fn nfa(pattern: &str) -> Automaton {
        build(&parse(pattern).unwrap()).unwrap()
    }

    fn ids(automaton: &Automaton) -> Vec<&str> {
        automaton.states.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_literal() {
        let nfa = nfa("a");
        assert_eq!(ids(&nfa), vec!["q0", "q1"]);
        assert_eq!(nfa.transitions, vec![Transition::new("q0", "q1", "a")]);
        assert!(nfa.states[0].is_initial && !nfa.states[0].is_final);
        assert!(nfa.states[1].is_final && !nfa.states[1].is_initial);
        assert_eq!(nfa.alphabet.iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_epsilon_literal() {
        for pattern in ["", "ε"] {
            let nfa = nfa(pattern);
            assert_eq!(nfa.states.len(), 1);
            assert!(nfa.states[0].is_initial && nfa.states[0].is_final);
            assert!(nfa.transitions.is_empty());
            assert!(nfa.alphabet.is_empty());
        }
    }

    #[test]
    fn test_concat() {
        let nfa = nfa("ab");
        assert_eq!(ids(&nfa), vec!["q0", "q1", "q2", "q3"]);
        assert_eq!(nfa.transitions.last(), Some(&Transition::epsilon("q1", "q2")));
        let initial: Vec<&str> = nfa
            .states
            .iter()
            .filter(|s| s.is_initial)
            .map(|s| s.id.as_str())
            .collect();
        let finals: Vec<&str> = nfa.final_states().map(|s| s.id.as_str()).collect();
        assert_eq!(initial, vec!["q0"]);
        assert_eq!(finals, vec!["q3"]);
        assert_eq!(nfa.alphabet.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_union() {
        let nfa = nfa("a|b");
        assert_eq!(ids(&nfa), vec!["q4", "q0", "q1", "q2", "q3", "q5"]);
        assert_eq!(nfa.initial_state().unwrap().id, "q4");
        assert_eq!(nfa.final_states().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["q5"]);
        assert_eq!(
            nfa.transitions,
            vec![
                Transition::epsilon("q4", "q0"),
                Transition::epsilon("q4", "q2"),
                Transition::new("q0", "q1", "a"),
                Transition::new("q2", "q3", "b"),
                Transition::epsilon("q1", "q5"),
                Transition::epsilon("q3", "q5"),
            ]
        );
    }

    #[test]
    fn test_star_separate() {
        let nfa = nfa("a*");
        assert_eq!(ids(&nfa), vec!["q2", "q0", "q1", "q3"]);
        assert_eq!(
            nfa.transitions,
            vec![
                Transition::epsilon("q2", "q0"),
                Transition::epsilon("q2", "q3"),
                Transition::new("q0", "q1", "a"),
                Transition::epsilon("q1", "q0"),
                Transition::epsilon("q1", "q3"),
            ]
        );
    }

    #[test]
    fn test_star_collapsed() {
        let config = EngineConfig {
            star_shape: StarShape::Collapsed,
            ..EngineConfig::default()
        };
        let nfa = build_with(&parse("a*").unwrap(), &config).unwrap();
        assert_eq!(ids(&nfa), vec!["q2", "q0", "q1"]);
        assert!(nfa.states[0].is_initial && nfa.states[0].is_final);
        assert_eq!(nfa.final_states().count(), 1);
        assert_eq!(
            nfa.transitions,
            vec![
                Transition::epsilon("q2", "q0"),
                Transition::new("q0", "q1", "a"),
                Transition::epsilon("q1", "q2"),
            ]
        );
    }

    #[test]
    fn test_exactly_one_initial_and_final() {
        for pattern in ["a", "ab", "a|b", "a*", "(a|b)*a", "(ab|c)*(d|ε)", "a**"] {
            let nfa = nfa(pattern);
            nfa.validate().unwrap();
            assert_eq!(nfa.states.iter().filter(|s| s.is_initial).count(), 1, "{pattern}");
            assert_eq!(nfa.final_states().count(), 1, "{pattern}");
        }
    }

    #[test]
    fn test_rebuild_is_identical() {
        let postfix = parse("(a|b)*abb").unwrap();
        assert_eq!(build(&postfix).unwrap(), build(&postfix).unwrap());
    }

    #[test]
    fn test_operand_underflow() {
        let postfix = vec![
            Spanned {
                token: Token::Symbol("a".into()),
                position: 0,
            },
            Spanned {
                token: Token::Union,
                position: 1,
            },
        ];
        assert!(matches!(
            build(&postfix),
            Err(Error::MalformedPattern { position: 1, .. })
        ));
        assert!(build(&parse("a|").unwrap()).is_err());
        assert!(build(&parse("a()").unwrap()).is_err());
    }

    #[test]
    fn test_leftover_fragments() {
        let postfix = vec![
            Spanned {
                token: Token::Symbol("a".into()),
                position: 0,
            },
            Spanned {
                token: Token::Symbol("b".into()),
                position: 1,
            },
        ];
        assert!(matches!(build(&postfix), Err(Error::MalformedPattern { .. })));
        assert!(build(&[]).is_err());
    }

    #[test]
    fn test_allocator_resumes_numbering() {
        let first = nfa("ab");
        let allocator = StateIdAllocator::resuming_after(&first, "q");
        assert_eq!(allocator.peek(), 4);

        let (second, allocator) =
            build_with_allocator(&parse("c").unwrap(), &EngineConfig::default(), allocator)
                .unwrap();
        assert_eq!(ids(&second), vec!["q4", "q5"]);
        assert_eq!(allocator.peek(), 6);

        let foreign = Automaton::new(vec![State::new("start")], Vec::new(), Alphabet::new());
        assert_eq!(StateIdAllocator::resuming_after(&foreign, "q").peek(), 0);
    }

    #[test]
    fn test_allocator_ignores_huge_ids() {
        let huge = Automaton::new(
            vec![State::new("q4294967295"), State::new("q7"), State::new("q99999999999999999999")],
            Vec::new(),
            Alphabet::new(),
        );
        let mut allocator = StateIdAllocator::resuming_after(&huge, "q");
        assert_eq!(allocator.peek(), 8);
        assert_eq!(allocator.next_id(), "q8");

        let near = Automaton::new(vec![State::new("q4294967294")], Vec::new(), Alphabet::new());
        let mut allocator = StateIdAllocator::resuming_after(&near, "q");
        assert_eq!(allocator.next_id(), "q4294967295");
        assert_eq!(allocator.next_id(), "q4294967296");
    }
}
