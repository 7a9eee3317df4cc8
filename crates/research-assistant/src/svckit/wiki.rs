//! Wikipedia Tool
//!
//! Looks up the top matching Wikipedia page for a query via the MediaWiki
//! API and returns its plain-text intro extract, capped at a configurable
//! character budget.

use agent_core::error::Result as AgentResult;
use agent_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; research-agent/0.1)";

/// A single Wikipedia lookup result
#[derive(Clone, Debug)]
pub struct WikiPage {
    pub title: String,
    pub extract: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Deserialize)]
struct ApiQuery {
    #[serde(default)]
    pages: std::collections::HashMap<String, ApiPage>,
}

#[derive(Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    index: Option<u32>,
}

/// Wikipedia lookup tool
pub struct WikipediaTool {
    client: reqwest::Client,
    endpoint: String,
    extract_chars: usize,
}

impl WikipediaTool {
    pub fn new(extract_chars: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.into(),
            extract_chars,
        })
    }

    /// Override the API endpoint (for other languages or mirrors)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Look up the top matching page for a query
    pub async fn lookup(&self, query: &str) -> Result<Option<WikiPage>> {
        let url = format!(
            "{}?action=query&format=json&prop=extracts&explaintext=1&exintro=1&redirects=1&generator=search&gsrlimit=1&gsrsearch={}",
            self.endpoint,
            urlencoding::encode(query)
        );

        let response: ApiResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(query_block) = response.query else {
            return Ok(None);
        };

        // gsrlimit=1 gives at most one page; index keeps ranking stable
        // if the API ever returns more
        let page = query_block
            .pages
            .into_values()
            .min_by_key(|p| p.index.unwrap_or(u32::MAX));

        Ok(page.map(|p| WikiPage {
            title: p.title,
            extract: cap_chars(&p.extract, self.extract_chars),
        }))
    }
}

/// Truncate to at most `max` characters on a char boundary
fn cap_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[async_trait]
impl Tool for WikipediaTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "wikipedia".into(),
            description: "Look up a topic on Wikipedia. Returns a capped-length summary of the best matching page.".into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "Topic or page to look up".into(),
                required: true,
            }],
        }
    }

    async fn execute(&self, call: &ToolCall) -> AgentResult<ToolResult> {
        let query = call.string_arg("query")?;
        tracing::debug!(query, "Looking up Wikipedia");

        match self.lookup(query).await {
            Ok(Some(page)) => Ok(ToolResult::success(
                "wikipedia",
                format!("Page: {}\n\n{}", page.title, page.extract),
            )),
            Ok(None) => Ok(ToolResult::success(
                "wikipedia",
                format!("No Wikipedia page found for: {query}"),
            )),
            Err(e) => Ok(ToolResult::failure("wikipedia", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_chars_on_boundary() {
        assert_eq!(cap_chars("hello world", 5), "hello");
        assert_eq!(cap_chars("héllo", 2), "hé");
        assert_eq!(cap_chars("short", 100), "short");
    }

    #[test]
    fn test_api_response_parsing_picks_top_ranked() {
        let raw = r#"{
            "query": {
                "pages": {
                    "123": {"title": "Great white shark", "extract": "The great white shark...", "index": 1},
                    "456": {"title": "Shark", "extract": "Sharks are...", "index": 2}
                }
            }
        }"#;

        let response: ApiResponse = serde_json::from_str(raw).unwrap();
        let page = response
            .query
            .unwrap()
            .pages
            .into_values()
            .min_by_key(|p| p.index.unwrap_or(u32::MAX))
            .unwrap();
        assert_eq!(page.title, "Great white shark");
    }

    #[test]
    fn test_api_response_without_query_block() {
        let response: ApiResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(response.query.is_none());
    }

    #[test]
    fn test_schema_requires_query() {
        let tool = WikipediaTool::new(1000).unwrap();
        let schema = tool.schema();
        assert_eq!(schema.name, "wikipedia");
        assert!(schema.parameters.iter().any(|p| p.name == "query" && p.required));
    }
}
