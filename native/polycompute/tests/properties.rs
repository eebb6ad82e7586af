//! Property tests over randomly generated patterns.
//!
//! Patterns are built from the literals `a`, `b`, `c` and `ε` with union,
//! concatenation and star, fully parenthesised so every generated string parses.

use polycompute::{
    AutomatonDocument, DfaNaming, EngineConfig, RejectSink, StarShape, closure_of,
    persist::{dfa_from_json, dfa_to_json},
    regex_to_nfa, regex_to_nfa_with, remove_epsilon_transitions, simulate, to_dfa, to_dfa_with,
};
use proptest::prelude::*;

fn arb_pattern() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("ε".to_string()),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l}|{r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{l}{r}")),
            inner.prop_map(|p| format!("({p})*")),
        ]
    })
}

fn arb_input() -> impl Strategy<Value = String> {
    "[abc]{0,6}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rebuilding_gives_identical_nfa(pattern in arb_pattern()) {
        prop_assert_eq!(regex_to_nfa(&pattern).unwrap(), regex_to_nfa(&pattern).unwrap());
    }

    #[test]
    fn closure_is_idempotent(pattern in arb_pattern()) {
        let nfa = regex_to_nfa(&pattern).unwrap();
        for state in &nfa.states {
            let once = closure_of(&nfa, [state.id.as_str()]).unwrap();
            prop_assert!(once.contains(&state.id));
            let twice = closure_of(&nfa, once.iter().map(String::as_str)).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn subset_construction_is_deterministic(pattern in arb_pattern()) {
        let nfa = regex_to_nfa(&pattern).unwrap();
        let dfa = to_dfa(&nfa).unwrap();
        prop_assert!(dfa.validate().is_ok());
        prop_assert_eq!(dfa, to_dfa(&nfa).unwrap());
    }

    #[test]
    fn dfa_accepts_what_nfa_accepts(pattern in arb_pattern(), input in arb_input()) {
        let nfa = regex_to_nfa(&pattern).unwrap();
        let expected = simulate(&nfa, &input).unwrap().accepted();

        prop_assert_eq!(to_dfa(&nfa).unwrap().accepts(&input), expected);

        let sparse = EngineConfig {
            dfa_naming: DfaNaming::Numbered,
            reject_sink: RejectSink::Omitted,
            ..EngineConfig::default()
        };
        prop_assert_eq!(to_dfa_with(&nfa, &sparse).unwrap().accepts(&input), expected);
    }

    #[test]
    fn epsilon_removal_keeps_language(pattern in arb_pattern(), input in arb_input()) {
        let nfa = regex_to_nfa(&pattern).unwrap();
        let stripped = remove_epsilon_transitions(&nfa).unwrap();
        prop_assert!(!stripped.has_epsilon_transitions());
        prop_assert_eq!(
            simulate(&stripped, &input).unwrap().accepted(),
            simulate(&nfa, &input).unwrap().accepted()
        );
    }

    #[test]
    fn star_shapes_agree(pattern in arb_pattern(), input in arb_input()) {
        let collapsed = EngineConfig {
            star_shape: StarShape::Collapsed,
            ..EngineConfig::default()
        };
        let separate = regex_to_nfa(&pattern).unwrap();
        let compact = regex_to_nfa_with(&pattern, &collapsed).unwrap();
        prop_assert_eq!(
            simulate(&compact, &input).unwrap().accepted(),
            simulate(&separate, &input).unwrap().accepted()
        );
    }

    #[test]
    fn json_round_trip(pattern in arb_pattern()) {
        let nfa = regex_to_nfa(&pattern).unwrap();
        let document = AutomatonDocument::new(nfa.clone());
        let loaded = AutomatonDocument::from_json(&document.to_json().unwrap()).unwrap();
        prop_assert_eq!(&loaded.nfa, &nfa);

        let dfa = to_dfa(&nfa).unwrap();
        prop_assert_eq!(dfa_from_json(&dfa_to_json(&dfa).unwrap()).unwrap(), dfa);
    }
}
