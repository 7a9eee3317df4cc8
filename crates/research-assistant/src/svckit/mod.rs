//! Research Tools
//!
//! The three capabilities exposed to the agent: web search, Wikipedia
//! lookup, and save-to-file.

pub mod save;
pub mod search;
pub mod wiki;

pub use save::{SaveNoteTool, DEFAULT_MIN_CHARS, REFUSE_SAVE};
pub use search::WebSearchTool;
pub use wiki::WikipediaTool;
