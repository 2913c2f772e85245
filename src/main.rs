use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use crewrun::cli::{Cli, Commands};
use crewrun::config::{self, AppConfig};
use crewrun::crew::{Crew, CrewOutput};
use crewrun::observe::langfuse::{LangfuseClient, traced_kickoff};
use crewrun::observe::run_log::RunLogger;
use crewrun::pipelines::{car_diagnosis, mcp_trading, tech_compare, traced_review, wiki_summary};
use crewrun::tools::introspect::ListAttachedTools;
use crewrun::tools::mcp::{McpServerParams, McpToolAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("crewrun starting");

    let config = config::load_config(&cli)?;
    tracing::info!(model = %config.model, max_iter = config.max_iter, "Config loaded");

    match cli.command {
        Commands::Wiki { topic } => {
            let crew = prepare(wiki_summary::crew(&config)?, &config)?;
            let result = kickoff(&crew, wiki_summary::inputs(&topic)).await?;
            print_result("--- Final Output ---", &result);
        }
        Commands::Mcp { query } => {
            let query = mcp_trading::normalize_query(&query);
            let adapter = McpToolAdapter::connect(&McpServerParams::from_config(&config)).await?;

            let result = match mcp_trading::crew(&config, adapter.tools(), &query) {
                Ok(crew) => match prepare(crew, &config) {
                    Ok(crew) => kickoff(&crew, HashMap::new()).await,
                    Err(e) => Err(e),
                },
                Err(e) => Err(e.into()),
            };
            // The session is closed whether or not the crew succeeded.
            adapter.close().await;

            print_result("=== Final Result ===", &result?);
        }
        Commands::McpTools => {
            let adapter = McpToolAdapter::connect(&McpServerParams::from_config(&config)).await?;
            println!("{}", ListAttachedTools::new(adapter.tools()).listing());
            adapter.close().await;
        }
        Commands::Traced { topic } => {
            let client = Arc::new(LangfuseClient::from_env(config.langfuse_host.as_deref()));
            let crew = prepare(traced_review::crew(&config, &topic)?, &config)?;

            let run = traced_kickoff(
                client,
                crew,
                traced_review::inputs(&topic),
                traced_review::trace_meta(&config),
            );
            let result = tokio::select! {
                result = run => result?,
                _ = tokio::signal::ctrl_c() => anyhow::bail!("Interrupted"),
            };
            print_result("=== FINAL OUTPUT ===", &result);
        }
        Commands::Diagnose { report } => {
            let crew = prepare(car_diagnosis::crew(&config, &report)?, &config)?;
            let result = kickoff(&crew, HashMap::new()).await?;
            print_result("=== Final Recommendation ===", &result);
        }
        Commands::Compare { tech_a, tech_b } => {
            let crew = prepare(tech_compare::crew(&config)?, &config)?;
            let result = kickoff(&crew, tech_compare::inputs(&tech_a, &tech_b)).await?;
            print_result("--- Final Output ---", &result);
        }
    }

    Ok(())
}

/// Run the crew, stopping early on Ctrl-C.
async fn kickoff(crew: &Crew, inputs: HashMap<String, String>) -> anyhow::Result<CrewOutput> {
    tokio::select! {
        result = crew.kickoff(inputs) => Ok(result?),
        _ = tokio::signal::ctrl_c() => anyhow::bail!("Interrupted"),
    }
}

/// Warn about a missing API key for the models this crew calls, then attach
/// the run log when enabled.
fn prepare(crew: Crew, config: &AppConfig) -> anyhow::Result<Crew> {
    warn_if_missing_api_key(&crew.models());
    if !config.run_log {
        return Ok(crew);
    }
    let logger = RunLogger::new(&config.run_log_dir).context("Failed to create run log")?;
    tracing::info!(path = %logger.log_path().display(), "Run log enabled");
    Ok(crew.with_observer(Arc::new(logger)))
}

fn print_result(heading: &str, output: &CrewOutput) {
    println!("\n{heading}\n");
    println!("{output}");
}

/// genai picks the OpenAI adapter for bare `gpt-*`/`o*` names and `openai::` prefixes.
fn uses_openai(model: &str) -> bool {
    if let Some((provider, _)) = model.split_once("::") {
        return provider == "openai";
    }
    model.starts_with("gpt")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
        || model.starts_with("chatgpt")
}

fn openai_models<'a>(models: &[&'a str]) -> Vec<&'a str> {
    models.iter().copied().filter(|m| uses_openai(m)).collect()
}

fn warn_if_missing_api_key(models: &[&str]) {
    let openai = openai_models(models);
    if !openai.is_empty() && std::env::var_os("OPENAI_API_KEY").is_none() {
        eprintln!(
            "Warning: OPENAI_API_KEY is not set; {} need it to run this pipeline.",
            openai.join(", ")
        );
    }
}
