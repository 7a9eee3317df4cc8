//! Configuration
//!
//! Explicit configuration record, built once at process start and passed
//! by reference to whatever constructs the agent. Library code never does
//! ambient environment lookups.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ResearchError, Result};

/// Which LLM backend to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Default model for this provider
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => Err(ResearchError::Config(format!(
                "unknown provider '{other}' (expected 'openai' or 'anthropic')"
            ))),
        }
    }
}

/// Runtime configuration for one research session
#[derive(Clone, Debug)]
pub struct ResearchConfig {
    /// LLM backend
    pub provider: ProviderKind,

    /// Model identifier
    pub model: String,

    /// OpenAI credential (required when provider is OpenAi)
    pub openai_api_key: Option<String>,

    /// Anthropic credential (required when provider is Anthropic)
    pub anthropic_api_key: Option<String>,

    /// Where saved notes are appended
    pub output_path: PathBuf,

    /// Minimum note length worth saving
    pub min_save_chars: usize,

    /// Character cap for Wikipedia extracts
    pub wiki_extract_chars: usize,

    /// Maximum web search results per query
    pub search_max_results: usize,

    /// Reasoning loop iteration cap
    pub max_iterations: usize,

    /// Sampling temperature (0 keeps the output format stable)
    pub temperature: f32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: ProviderKind::OpenAi.default_model().into(),
            openai_api_key: None,
            anthropic_api_key: None,
            output_path: PathBuf::from("outputs/research_output.txt"),
            min_save_chars: crate::svckit::DEFAULT_MIN_CHARS,
            wiki_extract_chars: 1000,
            search_max_results: 5,
            max_iterations: 10,
            temperature: 0.0,
        }
    }
}

impl ResearchConfig {
    /// Build from environment variables (read once at startup).
    ///
    /// Recognized: `RESEARCH_PROVIDER`, `RESEARCH_MODEL`,
    /// `RESEARCH_OUTPUT_FILE`, `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("RESEARCH_PROVIDER") {
            config.provider = provider.parse()?;
            config.model = config.provider.default_model().into();
        }
        if let Ok(model) = std::env::var("RESEARCH_MODEL") {
            config.model = model;
        }
        if let Ok(path) = std::env::var("RESEARCH_OUTPUT_FILE") {
            config.output_path = PathBuf::from(path);
        }

        config.openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        config.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(config)
    }

    /// Credential for the selected provider
    pub fn active_api_key(&self) -> Result<&str> {
        let (key, var) = match self.provider {
            ProviderKind::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            ProviderKind::Anthropic => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
        };

        key.as_deref()
            .ok_or_else(|| ResearchError::Config(format!("{var} is not set")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "Anthropic".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.output_path, PathBuf::from("outputs/research_output.txt"));
        assert_eq!(config.min_save_chars, 200);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_active_api_key_missing() {
        let config = ResearchConfig::default();
        let err = config.active_api_key().unwrap_err();
        assert!(matches!(err, ResearchError::Config(_)));
    }

    #[test]
    fn test_active_api_key_present() {
        let config = ResearchConfig {
            openai_api_key: Some("sk-test".into()),
            ..ResearchConfig::default()
        };
        assert_eq!(config.active_api_key().unwrap(), "sk-test");
    }
}
