//! Web Search Tool
//!
//! DuckDuckGo HTML search (no API key needed). Results are extracted from
//! the HTML response as ranked title + snippet pairs.

use agent_core::error::Result as AgentResult;
use agent_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

use crate::error::Result;

const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; research-agent/0.1)";

/// Web search tool backed by DuckDuckGo HTML
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(max_results: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.into(),
            max_results,
        })
    }

    /// Override the search endpoint (for proxies or mirrors)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Run a search and return ranked text snippets
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("{}/?q={}", self.endpoint, urlencoding::encode(query));

        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_results(&html, self.max_results))
    }
}

/// Extract title + snippet pairs from DuckDuckGo HTML result markup
fn extract_results(html: &str, max_results: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("No title");

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("No snippet");

        results.push(format!("{}: {}", title.trim(), snippet.trim()));
    }

    results
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search".into(),
            description: "Search the web for information. Returns ranked results with titles and snippets.".into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "The search query".into(),
                required: true,
            }],
        }
    }

    async fn execute(&self, call: &ToolCall) -> AgentResult<ToolResult> {
        let query = call.string_arg("query")?;
        tracing::debug!(query, "Running web search");

        match self.search(query).await {
            Ok(results) if results.is_empty() => Ok(ToolResult::success(
                "search",
                format!("No results found for: {query}"),
            )),
            Ok(results) => Ok(ToolResult::success("search", results.join("\n\n"))),
            Err(e) => Ok(ToolResult::failure("search", e.to_string())),
        }
    }
}
