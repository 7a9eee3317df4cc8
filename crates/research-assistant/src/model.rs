//! Domain Model
//!
//! The structured result a research run is expected to produce.

use serde::{Deserialize, Serialize};

/// Structured output of one research run.
///
/// Built exactly once per run from the agent's raw text and immediately
/// serialized for display; it has no further lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// Central topic of the research
    pub topic: String,

    /// Synthesized findings
    pub summary: String,

    /// Citations or URLs, in the order the agent produced them
    pub sources: Vec<String>,

    /// Names of the tools that contributed
    pub tools_used: Vec<String>,
}

impl ResearchResult {
    /// Pretty JSON rendering for display
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let result = ResearchResult {
            topic: "White Sharks".into(),
            summary: "Apex predators of temperate coastal waters.".into(),
            sources: vec!["wikipedia.org/wiki/Great_white_shark".into()],
            tools_used: vec!["wikipedia".into()],
        };

        let json = result.to_json_pretty();
        let back: ResearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_pretty_json_contains_all_keys() {
        let result = ResearchResult {
            topic: "t".into(),
            summary: "s".into(),
            sources: vec!["a".into()],
            tools_used: vec!["b".into()],
        };

        let json = result.to_json_pretty();
        for key in ["topic", "summary", "sources", "tools_used"] {
            assert!(json.contains(key));
        }
    }
}
