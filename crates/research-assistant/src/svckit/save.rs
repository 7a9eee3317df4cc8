//! Save-To-File Tool
//!
//! Appends research notes to a local text file. Guarded by a minimum
//! length so the model cannot save trivial or premature content.
//!
//! Not safe for concurrent writers: appends are unlocked, which is fine
//! for the single-process, one-invocation-per-run usage this crate
//! supports.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use agent_core::error::{AgentError, Result as AgentResult};
use agent_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use chrono::Local;

use crate::error::Result;

/// Default minimum content length (in characters) worth saving
pub const DEFAULT_MIN_CHARS: usize = 200;

/// Refusal message returned when content is below the minimum
pub const REFUSE_SAVE: &str = "REFUSE_SAVE: content_too_short";

/// Append a timestamped note block to `path`.
///
/// Content whose trimmed length is below `min_chars` is not written; the
/// refusal message is returned instead (a no-op, not an error). Otherwise
/// the parent directory is created if needed and exactly one block is
/// appended; existing contents are never touched.
pub fn save_note(path: &Path, data: &str, min_chars: usize) -> Result<String> {
    if data.trim().chars().count() < min_chars {
        return Ok(REFUSE_SAVE.into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let block = format!(
        "--- Research Output ---\nTimestamp: {timestamp}\n\n{}\n\n",
        data.trim_end()
    );

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())?;

    Ok(format!("Data successfully saved to {}", path.display()))
}

/// Tool exposing [`save_note`] to the agent as `save_to_file`
pub struct SaveNoteTool {
    path: PathBuf,
    min_chars: usize,
}

impl SaveNoteTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }
}

#[async_trait]
impl Tool for SaveNoteTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "save_to_file".into(),
            description: "Save research data to a text file. Call once, with the full aggregated notes.".into(),
            parameters: vec![ParameterSchema {
                name: "data".into(),
                param_type: "string".into(),
                description: "The complete research notes to save (plain text)".into(),
                required: true,
            }],
        }
    }

    async fn execute(&self, call: &ToolCall) -> AgentResult<ToolResult> {
        let data = call.string_arg("data")?;

        match save_note(&self.path, data, self.min_chars) {
            Ok(message) => {
                if message != REFUSE_SAVE {
                    tracing::info!(path = %self.path.display(), "Saved research notes");
                }
                Ok(ToolResult::success("save_to_file", message))
            }
            Err(e) => Err(AgentError::ToolExecution(format!(
                "save_to_file failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn long_text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_short_content_refused_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");

        let message = save_note(&path, &long_text(50), DEFAULT_MIN_CHARS).unwrap();
        assert_eq!(message, REFUSE_SAVE);
        assert!(!path.exists());
    }

    #[test]
    fn test_whitespace_padding_does_not_pass_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");

        let padded = format!("{}{}", long_text(150), " ".repeat(100));
        let message = save_note(&path, &padded, DEFAULT_MIN_CHARS).unwrap();
        assert_eq!(message, REFUSE_SAVE);
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_file_byte_identical_after_refused_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");
        std::fs::write(&path, "prior contents\n").unwrap();

        save_note(&path, "too short", DEFAULT_MIN_CHARS).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"prior contents\n");
    }

    #[test]
    fn test_save_appends_one_block_with_verbatim_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outputs").join("research_output.txt");

        let data = long_text(250);
        let message = save_note(&path, &data, DEFAULT_MIN_CHARS).unwrap();
        assert!(message.contains("research_output.txt"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("--- Research Output ---").count(), 1);
        assert!(contents.contains("Timestamp: "));
        assert!(contents.contains(&data));
        assert!(contents.ends_with("\n\n"));
    }

    #[test]
    fn test_save_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");

        let first = long_text(250);
        save_note(&path, &first, DEFAULT_MIN_CHARS).unwrap();
        let after_first = std::fs::read_to_string(&path).unwrap();

        let second = format!("{} second note", long_text(250));
        save_note(&path, &second, DEFAULT_MIN_CHARS).unwrap();
        let after_second = std::fs::read_to_string(&path).unwrap();

        assert!(after_second.starts_with(&after_first));
        assert_eq!(after_second.matches("--- Research Output ---").count(), 2);
    }

    #[tokio::test]
    async fn test_tool_requires_data_argument() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SaveNoteTool::new(dir.path().join("out.txt"));

        let call = ToolCall {
            name: "save_to_file".into(),
            arguments: HashMap::new(),
            id: None,
        };
        assert!(tool.validate(&call).is_err());
    }

    #[tokio::test]
    async fn test_tool_executes_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let tool = SaveNoteTool::new(&path).with_min_chars(10);

        let mut arguments = HashMap::new();
        arguments.insert(
            "data".to_string(),
            serde_json::json!("long enough research notes"),
        );
        let call = ToolCall {
            name: "save_to_file".into(),
            arguments,
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("successfully saved"));
        assert!(path.exists());
    }
}
