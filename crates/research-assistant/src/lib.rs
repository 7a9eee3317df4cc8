//! # research-assistant
//!
//! Research assistant built on `agent-core`: the agent gathers
//! information with web search and Wikipedia tools, saves its aggregated
//! notes to a local file, and returns a structured JSON result.
//!
//! ## Flow
//!
//! ```text
//! user query ──► agent (reasoning loop)
//!                  ├── search      (DuckDuckGo HTML)
//!                  ├── wikipedia   (MediaWiki extracts)
//!                  └── save_to_file (append-only, length-guarded)
//!                        │
//!                        ▼
//!               raw final text ──► output::parse_research_result
//!                                        │
//!                                        ▼
//!                              ResearchResult (JSON)
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod svckit;

pub use config::{ProviderKind, ResearchConfig};
pub use error::{ResearchError, Result};
pub use model::ResearchResult;
pub use output::{format_instructions, parse_research_result};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{SaveNoteTool, WebSearchTool, WikipediaTool};
}

/// Base system prompt for the research assistant agent
pub const RESEARCH_ASSISTANT_PROMPT: &str = r#"You are a research assistant.
Follow this exact order:
1) Use the search and wikipedia tools to gather information. Do NOT call save_to_file yet.
2) Aggregate FULL raw findings into comprehensive notes (no truncation).
3) Call the save_to_file tool ONCE with the FULL notes (plain text).
4) Finally, return ONLY the JSON answer in the required format.
Never call save_to_file before you have gathered and aggregated the notes."#;

/// Full system prompt: instructions plus the output-format contract.
/// Tool descriptions are appended separately by the agent.
pub fn system_prompt() -> String {
    format!(
        "{RESEARCH_ASSISTANT_PROMPT}\n\n## Output Format\n\n{}",
        output::format_instructions()
    )
}
