//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// Outcome of one agent run: the final free-form text plus the ordered
/// record of every tool call made along the way.
#[derive(Clone, Debug)]
pub struct AgentRun {
    /// Final assistant response (no tool call detected)
    pub output: String,

    /// Tool results in execution order
    pub tool_trace: Vec<ToolResult>,
}

impl AgentRun {
    /// Names of tools that executed successfully, deduplicated,
    /// in first-use order.
    pub fn tools_used(&self) -> Vec<String> {
        let mut names = Vec::new();
        for result in self.tool_trace.iter().filter(|r| r.success) {
            if !names.contains(&result.name) {
                names.push(result.name.clone());
            }
        }
        names
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation until a final (non-tool) response
    pub async fn run(&self, conversation: &mut Conversation) -> Result<AgentRun> {
        // Ensure system prompt is set
        if conversation.messages().first().map(|m| &m.role) != Some(&Role::System) {
            let messages = conversation.messages_mut();
            messages.insert(0, Message::system(self.build_system_prompt()));
        }

        let mut tool_trace = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            // Keep the context inside the token budget before each call
            conversation.truncate_to_fit();

            // Get completion from provider
            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content.clone();

            // Add assistant response to conversation
            conversation.push(Message::assistant(&content));

            // Check for tool calls
            if let Some(tool_call) = self.parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, "Executing tool");

                // Execute the tool
                let result = self.execute_tool(&tool_call).await;

                // Add tool result to conversation
                let tool_message = self.format_tool_result(&result);
                conversation.push(Message::tool(tool_message, tool_call.id.clone()));

                tool_trace.push(result);

                // Continue reasoning loop
                continue;
            }

            // No tool call - this is the final response
            return Ok(AgentRun {
                output: content,
                tool_trace,
            });
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<AgentRun> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Parse a tool call from LLM response
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    // Generate call ID if not present
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: try to find raw JSON with "tool" key
        self.parse_inline_tool_call(content)
    }

    /// Try to parse inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        // Find JSON boundaries
        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        let mut call = serde_json::from_str::<ToolCall>(json_str).ok()?;
        if call.id.is_none() {
            call.id = Some(uuid::Uuid::new_v4().to_string());
        }
        Some(call)
    }

    /// Execute a tool call
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => ToolResult {
                name: call.name.clone(),
                id: call.id.clone(),
                success: false,
                output: format!("Error: {e}"),
            },
        }
    }

    /// Format tool result for conversation
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, FinishReason, ProviderInfo};
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that replays a fixed script of responses and records the
    /// message list of every `complete()` call.
    struct ScriptedProvider {
        responses: Mutex<Vec<String>>,
        requests: Mutex<Vec<Vec<(Role, String)>>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<&str>) -> Self {
            let mut responses: Vec<String> = responses.into_iter().map(String::from).collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<(Role, String)>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "Scripted".into(),
                default_model: "test".into(),
                supports_tools: false,
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            self.requests.lock().unwrap().push(
                messages
                    .iter()
                    .map(|m| (m.role.clone(), m.content.clone()))
                    .collect(),
            );
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }
    }

    struct UppercaseTool;

    #[async_trait]
    impl Tool for UppercaseTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "uppercase".into(),
                description: "Uppercase the given text".into(),
                parameters: vec![ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Text to transform".into(),
                    required: true,
                }],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call.string_arg("text")?;
            Ok(ToolResult::success("uppercase", text.to_uppercase()))
        }
    }

    fn agent_with_script(responses: Vec<&str>) -> Agent {
        AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(responses)))
            .tool(UppercaseTool)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_without_tool_call() {
        let agent = agent_with_script(vec!["Just a direct answer."]);
        let run = agent.ask("hello").await.unwrap();

        assert_eq!(run.output, "Just a direct answer.");
        assert!(run.tool_trace.is_empty());
        assert!(run.tools_used().is_empty());
    }

    #[tokio::test]
    async fn test_run_executes_tool_and_records_trace() {
        let agent = agent_with_script(vec![
            "Let me transform that.\n```tool\n{\"tool\": \"uppercase\", \"arguments\": {\"text\": \"shark\"}}\n```",
            "The answer is SHARK.",
        ]);

        let run = agent.ask("uppercase shark").await.unwrap();

        assert_eq!(run.output, "The answer is SHARK.");
        assert_eq!(run.tool_trace.len(), 1);
        assert!(run.tool_trace[0].success);
        assert_eq!(run.tool_trace[0].output, "SHARK");
        assert_eq!(run.tools_used(), vec!["uppercase".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_tool_call_is_fed_back_not_fatal() {
        let agent = agent_with_script(vec![
            "```tool\n{\"tool\": \"missing_tool\", \"arguments\": {}}\n```",
            "Could not use that tool.",
        ]);

        let run = agent.ask("try a bad tool").await.unwrap();

        assert_eq!(run.output, "Could not use that tool.");
        assert_eq!(run.tool_trace.len(), 1);
        assert!(!run.tool_trace[0].success);
        // Failed calls do not count toward tools_used
        assert!(run.tools_used().is_empty());
    }

    #[tokio::test]
    async fn test_user_query_still_visible_after_tool_round() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "```tool\n{\"tool\": \"uppercase\", \"arguments\": {\"text\": \"shark\"}}\n```",
            "The answer is SHARK.",
        ]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .tool(UppercaseTool)
            .build()
            .unwrap();

        agent.ask("tell me about white sharks").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);

        // The request after a tool round must still carry the full turn
        // history: system, the user's question, the assistant's tool
        // call, and the tool result. Nothing gets dropped.
        let second = &requests[1];
        let roles: Vec<&Role> = second.iter().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![&Role::System, &Role::User, &Role::Assistant, &Role::Tool]
        );
        assert!(
            second
                .iter()
                .any(|(role, content)| *role == Role::User
                    && content == "tell me about white sharks"),
            "user query missing from second request"
        );
        assert!(
            second
                .iter()
                .any(|(role, content)| *role == Role::Tool && content.contains("SHARK")),
            "tool result missing from second request"
        );
    }

    #[tokio::test]
    async fn test_max_iterations_enforced() {
        // Every response asks for another tool call
        let loop_response =
            "```tool\n{\"tool\": \"uppercase\", \"arguments\": {\"text\": \"x\"}}\n```";
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(vec![loop_response; 5])))
            .tool(UppercaseTool)
            .max_iterations(3)
            .build()
            .unwrap();

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(3)));
    }

    #[tokio::test]
    async fn test_inline_tool_call_parsed() {
        let agent = agent_with_script(vec![
            r#"I will call {"tool": "uppercase", "arguments": {"text": "ok"}} now"#,
            "Done.",
        ]);

        let run = agent.ask("inline").await.unwrap();
        assert_eq!(run.tool_trace.len(), 1);
        assert_eq!(run.tool_trace[0].output, "OK");
    }

    #[tokio::test]
    async fn test_tools_used_deduplicates_preserving_order() {
        let tool_call =
            "```tool\n{\"tool\": \"uppercase\", \"arguments\": {\"text\": \"a\"}}\n```";
        let agent = agent_with_script(vec![tool_call, tool_call, "final"]);

        let run = agent.ask("twice").await.unwrap();
        assert_eq!(run.tool_trace.len(), 2);
        assert_eq!(run.tools_used(), vec!["uppercase".to_string()]);
    }
}
