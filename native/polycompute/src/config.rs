//! Engine configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a valid
//! configuration. The defaults reproduce the canonical behaviour of the engine.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How the Thompson constructor shapes a Kleene star fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarShape {
    /// Fresh start and end states around the operand.
    #[default]
    Separate,
    /// One fresh state that is both initial and final.
    Collapsed,
}

/// How subset construction names DFA states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DfaNaming {
    /// Sorted NFA ids joined with `_`, `∅` for the empty set.
    #[default]
    Canonical,
    /// `e1`, `e2`, ... in discovery order.
    Numbered,
}

/// Whether the empty state set becomes an explicit DFA state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectSink {
    /// Materialise the `∅` state with self-loops.
    #[default]
    Explicit,
    /// Leave transitions into `∅` out of the DFA.
    Omitted,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of state ids generated by the Thompson constructor.
    pub state_prefix: String,
    /// Shape of Kleene star fragments.
    pub star_shape: StarShape,
    /// Run the epsilon removal pass after regex conversion.
    pub strip_epsilon: bool,
    /// DFA state naming scheme.
    pub dfa_naming: DfaNaming,
    /// Treatment of the empty state set during subset construction.
    pub reject_sink: RejectSink,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_prefix: "q".to_string(),
            star_shape: StarShape::default(),
            strip_epsilon: false,
            dfa_naming: DfaNaming::default(),
            reject_sink: RejectSink::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.state_prefix, "q");
    }

    #[test]
    fn test_partial_config() {
        let config =
            EngineConfig::from_json_str(r#"{"star_shape": "collapsed", "dfa_naming": "numbered"}"#)
                .unwrap();
        assert_eq!(config.star_shape, StarShape::Collapsed);
        assert_eq!(config.dfa_naming, DfaNaming::Numbered);
        assert_eq!(config.reject_sink, RejectSink::Explicit);
        assert!(!config.strip_epsilon);
    }

    #[test]
    fn test_bad_variant_is_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"reject_sink": "sometimes"}"#).is_err());
    }
}
