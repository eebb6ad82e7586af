//! JSON documents for saved automata.
//!
//! A document wraps an automaton with optional descriptive metadata. Field
//! names are camelCase (`isInitial`, `isFinal`), matching `.nfa` files.
//! Loading validates the automaton before handing it out.

use crate::automaton::{Automaton, Dfa};
use crate::error::Result;
use crate::regex::StateIdAllocator;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Untitled NFA";
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Descriptive fields stored next to an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    /// Creation timestamp, as supplied by the caller.
    pub created: String,
    /// Pattern the automaton was built from, if any.
    pub regex: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Metadata {
    /// Metadata with blank fields replaced by their defaults.
    pub fn new(name: &str, description: &str) -> Self {
        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            name: or_default(name, DEFAULT_NAME),
            description: or_default(description, DEFAULT_DESCRIPTION),
            created: String::new(),
            regex: String::new(),
        }
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = regex.into();
        self
    }

    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into();
        self
    }
}

/// A saved automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDocument {
    pub nfa: Automaton,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl AutomatonDocument {
    pub fn new(nfa: Automaton) -> Self {
        Self {
            nfa,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.nfa.validate()?;
        Ok(document)
    }

    /// An id allocator that continues after the loaded states, so states
    /// added later never collide with them.
    pub fn id_allocator(&self, prefix: &str) -> StateIdAllocator {
        StateIdAllocator::resuming_after(&self.nfa, prefix)
    }
}

/// Pretty-printed JSON of a DFA, including `initialState`, `finalStates` and `nfaStates`.
pub fn dfa_to_json(dfa: &Dfa) -> Result<String> {
    Ok(serde_json::to_string_pretty(dfa)?)
}

/// Parse a DFA and check it is well formed and deterministic.
pub fn dfa_from_json(json: &str) -> Result<Dfa> {
    let dfa: Dfa = serde_json::from_str(json)?;
    dfa.validate()?;
    Ok(dfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::regex::regex_to_nfa;
    use crate::subset::to_dfa;

    const SAVED: &str = r#"{
  "nfa": {
    "states": [
      { "id": "q0", "label": "q0", "isInitial": true, "isFinal": false },
      { "id": "q1", "label": "q1", "isInitial": false, "isFinal": true }
    ],
    "transitions": [ { "from": "q0", "to": "q1", "symbol": "a" } ],
    "alphabet": ["a"]
  },
  "metadata": {
    "name": "single",
    "description": "one a",
    "created": "2024-05-01T10:00:00.000Z",
    "regex": "a"
  }
}"#;

    #[test]
    fn test_load_saved_document() {
        let document = AutomatonDocument::from_json(SAVED).unwrap();
        assert_eq!(document.nfa.states.len(), 2);
        assert!(document.nfa.states[1].is_final);
        let metadata = document.metadata.unwrap();
        assert_eq!(metadata.name, "single");
        assert_eq!(metadata.regex, "a");
    }

    #[test]
    fn test_round_trip() {
        let nfa = regex_to_nfa("(a|b)*a").unwrap();
        let document = AutomatonDocument::new(nfa)
            .with_metadata(Metadata::new("ends in a", "").with_regex("(a|b)*a"));
        let json = document.to_json().unwrap();
        assert!(json.contains("\"isInitial\": true"));
        assert!(json.contains(DEFAULT_DESCRIPTION));
        assert_eq!(AutomatonDocument::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = Metadata::new("  ", "");
        assert_eq!(metadata.name, DEFAULT_NAME);
        assert_eq!(metadata.description, DEFAULT_DESCRIPTION);

        let json = r#"{
            "nfa": {
                "states": [{ "id": "p", "label": "p", "isInitial": true, "isFinal": true }],
                "transitions": []
            },
            "metadata": { "name": "x" }
        }"#;
        let document = AutomatonDocument::from_json(json).unwrap();
        assert!(document.nfa.alphabet.is_empty());
        let metadata = document.metadata.unwrap();
        assert_eq!(metadata.name, "x");
        assert_eq!(metadata.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            AutomatonDocument::from_json("{ not json"),
            Err(Error::Json(_))
        ));

        let two_initial = SAVED.replace("\"isInitial\": false", "\"isInitial\": true");
        assert!(matches!(
            AutomatonDocument::from_json(&two_initial),
            Err(Error::InvalidPersistedAutomaton(_))
        ));

        let dangling = SAVED.replace("\"to\": \"q1\"", "\"to\": \"q7\"");
        assert!(matches!(
            AutomatonDocument::from_json(&dangling),
            Err(Error::InvalidPersistedAutomaton(_))
        ));
    }

    #[test]
    fn test_id_allocator_resumes() {
        let document = AutomatonDocument::from_json(SAVED).unwrap();
        let mut ids = document.id_allocator("q");
        assert_eq!(ids.next_id(), "q2");

        let huge = SAVED.replace("\"q1\"", "\"q4294967295\"");
        let document = AutomatonDocument::from_json(&huge).unwrap();
        assert_eq!(document.id_allocator("q").next_id(), "q1");
    }

    #[test]
    fn test_dfa_json() {
        let dfa = to_dfa(&regex_to_nfa("a*").unwrap()).unwrap();
        let json = dfa_to_json(&dfa).unwrap();
        assert!(json.contains("\"initialState\": \"q0_q2_q3\""));
        assert!(json.contains("\"nfaStates\""));
        assert_eq!(dfa_from_json(&json).unwrap(), dfa);

        let broken = json.replace(
            "\"initialState\": \"q0_q2_q3\"",
            "\"initialState\": \"q0_q1_q3\"",
        );
        assert!(dfa_from_json(&broken).is_err());
    }
}
