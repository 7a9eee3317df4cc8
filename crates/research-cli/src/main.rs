//! Research Assistant CLI
//!
//! Reads one research query (argv or interactive prompt), runs the agent
//! with its search/wikipedia/save tools, and prints the structured JSON
//! result. On a parse failure the raw agent output is shown instead.

use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider, ToolRegistry};
use agent_runtime::{AnthropicProvider, OpenAiProvider};
use research_assistant::{
    config::ProviderKind,
    parse_research_result, system_prompt,
    tools::{SaveNoteTool, WebSearchTool, WikipediaTool},
    ResearchConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ResearchConfig::from_env()?;

    let query = read_query()?;
    if query.is_empty() {
        println!("Empty query. Aborting.");
        return Ok(());
    }

    // Initialize LLM provider
    let api_key = config.active_api_key()?;
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key)?),
    };

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to {}", provider.info().name),
        Ok(false) | Err(_) => {
            tracing::warn!(
                "⚠ {} not reachable - the run will likely fail",
                provider.info().name
            );
        }
    }

    // Initialize tools
    let mut tools = ToolRegistry::new();
    tools.register(WebSearchTool::new(config.search_max_results)?);
    tools.register(WikipediaTool::new(config.wiki_extract_chars)?);
    tools.register(
        SaveNoteTool::new(&config.output_path).with_min_chars(config.min_save_chars),
    );

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Build the agent
    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(system_prompt())
        .model(config.model.clone())
        .temperature(config.temperature)
        .max_iterations(config.max_iterations)
        .build()?;

    tracing::info!(model = %config.model, "Running research agent");
    let run = agent.ask(&query).await?;
    tracing::debug!(tools_used = ?run.tools_used(), "Agent run finished");

    match parse_research_result(&run.output) {
        Ok(result) => println!("{}", result.to_json_pretty()),
        Err(e) => {
            println!("{}", run.output);
            eprintln!("Failed to parse structured output: {e}");
        }
    }

    Ok(())
}

/// Query from argv (joined) or one line from an interactive prompt
fn read_query() -> anyhow::Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" ").trim().to_string());
    }

    print!("What can I help you research? ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
