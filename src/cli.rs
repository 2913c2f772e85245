use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crewrun", version, about = "Run LLM agent crews: sequential and manager-delegated pipelines")]
pub struct Cli {
    /// Path to config file (overrides ./crewrun.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Default worker model (e.g., "gpt-4o-mini", "ollama::llama3.2")
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Mirror every agent step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic with the Wikipedia tool, then rewrite it in a fun tone
    Wiki {
        /// Topic to research
        #[arg(short, long, default_value = "Moon landing")]
        topic: String,
    },
    /// Answer a trading query using tools from the MCP server
    Mcp {
        /// Free-text query (defaults to "Give me my portfolio?")
        query: Vec<String>,
    },
    /// Print the tools attached from the MCP server as JSON
    McpTools,
    /// Research, write and review a topic with Langfuse tracing
    Traced {
        /// Topic to research
        #[arg(short, long, default_value = "Langfuse + agent pipelines")]
        topic: String,
    },
    /// Hierarchical car diagnosis with oil and tire specialists
    Diagnose {
        /// Symptom report from the driver
        #[arg(short, long, default_value = "My car makes a strange noise when driving, feels bumpy.")]
        report: String,
    },
    /// Hierarchical comparison of two web technologies
    Compare {
        #[arg(long, default_value = "Flask")]
        tech_a: String,

        #[arg(long, default_value = "FastAPI")]
        tech_b: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcp_query_collects_free_text() {
        let cli = Cli::parse_from(["crewrun", "mcp", "list", "my", "products"]);
        match cli.command {
            Commands::Mcp { query } => assert_eq!(query.join(" "), "list my products"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["crewrun", "compare", "--tech-a", "Django", "--model", "gpt-4o", "-v"]);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert!(cli.verbose);
        match cli.command {
            Commands::Compare { tech_a, tech_b } => {
                assert_eq!(tech_a, "Django");
                assert_eq!(tech_b, "FastAPI");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
