//! # agent-runtime
//!
//! Runtime providers for the research-agent system.
//!
//! ## Providers
//!
//! - **OpenAI** (default): chat completions API
//! - **Anthropic** (default): messages API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new(api_key)?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicConfig, AnthropicProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, AgentRun, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
