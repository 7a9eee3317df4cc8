//! Structured-Output Parser
//!
//! Coerces the agent's raw final text into a [`ResearchResult`]. The model
//! is asked (via [`format_instructions`]) to answer with a single JSON
//! object, but real responses come back bare, inside code fences, or
//! embedded in prose, so extraction is tolerant. Validation is not: a
//! missing or empty field is a parse failure, never a partial result.

use crate::error::{ResearchError, Result};
use crate::model::ResearchResult;

/// Schema description injected into the system prompt so the model knows
/// the required output shape.
pub fn format_instructions() -> String {
    r#"Respond with a single JSON object and nothing else. The object must have exactly these fields:
{
  "topic": "<short text identifying the research subject>",
  "summary": "<synthesized findings>",
  "sources": ["<citation or URL>", ...],
  "tools_used": ["<tool name>", ...]
}
All four fields are required and must be non-empty. "sources" and "tools_used" are flat arrays of strings."#
        .into()
}

/// Parse the agent's raw output into a `ResearchResult`.
///
/// Pure function: no side effects, equal inputs give equal results.
pub fn parse_research_result(raw: &str) -> Result<ResearchResult> {
    let json_str = extract_json_object(raw).ok_or_else(|| {
        ResearchError::Parse("no JSON object found in agent output".into())
    })?;

    let result: ResearchResult = serde_json::from_str(json_str)
        .map_err(|e| ResearchError::Parse(format!("malformed research result: {e}")))?;

    validate(&result)?;
    Ok(result)
}

/// Locate the JSON object inside raw model output.
///
/// Tries, in order: a ```json fenced block, any ``` fenced block, and
/// finally the outermost brace pair in the text.
fn extract_json_object(raw: &str) -> Option<&str> {
    for fence in ["```json", "```"] {
        if let Some(start) = raw.find(fence) {
            let after = &raw[start + fence.len()..];
            if let Some(end) = after.find("```") {
                let candidate = after[..end].trim();
                if candidate.starts_with('{') {
                    return Some(candidate);
                }
            }
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(raw[start..=end].trim())
}

fn validate(result: &ResearchResult) -> Result<()> {
    if result.topic.trim().is_empty() {
        return Err(ResearchError::Parse("field 'topic' is empty".into()));
    }
    if result.summary.trim().is_empty() {
        return Err(ResearchError::Parse("field 'summary' is empty".into()));
    }
    if result.sources.is_empty() || result.sources.iter().any(|s| s.trim().is_empty()) {
        return Err(ResearchError::Parse(
            "field 'sources' is empty or contains empty entries".into(),
        ));
    }
    if result.tools_used.is_empty() || result.tools_used.iter().any(|s| s.trim().is_empty()) {
        return Err(ResearchError::Parse(
            "field 'tools_used' is empty or contains empty entries".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{"topic":"White Sharks","summary":"Apex predators found in coastal surface waters.","sources":["wikipedia.org/wiki/Great_white_shark"],"tools_used":["wiki"]}"#;

    #[test]
    fn test_parse_bare_json() {
        let result = parse_research_result(WELL_FORMED).unwrap();
        assert_eq!(result.topic, "White Sharks");
        assert_eq!(
            result.sources,
            vec!["wikipedia.org/wiki/Great_white_shark".to_string()]
        );
        assert_eq!(result.tools_used, vec!["wiki".to_string()]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = format!("Here is the result:\n```json\n{WELL_FORMED}\n```\nDone.");
        let result = parse_research_result(&raw).unwrap();
        assert_eq!(result.topic, "White Sharks");
    }

    #[test]
    fn test_parse_plain_fence() {
        let raw = format!("```\n{WELL_FORMED}\n```");
        assert!(parse_research_result(&raw).is_ok());
    }

    #[test]
    fn test_parse_embedded_in_prose() {
        let raw = format!("Sure! {WELL_FORMED} Hope that helps.");
        let result = parse_research_result(&raw).unwrap();
        assert_eq!(result.summary, "Apex predators found in coastal surface waters.");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let a = parse_research_result(WELL_FORMED).unwrap();
        let b = parse_research_result(WELL_FORMED).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_field_fails() {
        // Each variant drops one required field
        let missing = [
            r#"{"summary":"s","sources":["a"],"tools_used":["b"]}"#,
            r#"{"topic":"t","sources":["a"],"tools_used":["b"]}"#,
            r#"{"topic":"t","summary":"s","tools_used":["b"]}"#,
            r#"{"topic":"t","summary":"s","sources":["a"]}"#,
        ];

        for raw in missing {
            let err = parse_research_result(raw).unwrap_err();
            assert!(matches!(err, ResearchError::Parse(_)), "input: {raw}");
        }
    }

    #[test]
    fn test_empty_field_fails() {
        let empties = [
            r#"{"topic":"","summary":"s","sources":["a"],"tools_used":["b"]}"#,
            r#"{"topic":"t","summary":"  ","sources":["a"],"tools_used":["b"]}"#,
            r#"{"topic":"t","summary":"s","sources":[],"tools_used":["b"]}"#,
            r#"{"topic":"t","summary":"s","sources":["a"],"tools_used":[""]}"#,
        ];

        for raw in empties {
            let err = parse_research_result(raw).unwrap_err();
            assert!(matches!(err, ResearchError::Parse(_)), "input: {raw}");
        }
    }

    #[test]
    fn test_nested_sources_rejected() {
        let raw = r#"{"topic":"t","summary":"s","sources":[{"url":"a"}],"tools_used":["b"]}"#;
        assert!(parse_research_result(raw).is_err());
    }

    #[test]
    fn test_no_json_at_all_fails() {
        let err = parse_research_result("Agent stopped due to max iterations.").unwrap_err();
        assert!(matches!(err, ResearchError::Parse(_)));
    }

    #[test]
    fn test_source_order_preserved() {
        let raw = r#"{"topic":"t","summary":"s","sources":["first","second","third"],"tools_used":["b"]}"#;
        let result = parse_research_result(raw).unwrap();
        assert_eq!(result.sources, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_format_instructions_name_all_fields() {
        let instructions = format_instructions();
        for key in ["topic", "summary", "sources", "tools_used"] {
            assert!(instructions.contains(key));
        }
    }
}
