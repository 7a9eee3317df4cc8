//! Error Types for the Research Assistant

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResearchError>;

#[derive(Error, Debug)]
pub enum ResearchError {
    /// The agent's final output cannot be coerced to the structured shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Saving a note to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A search/wiki backend request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
