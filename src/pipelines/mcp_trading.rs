//! Crypto trading assistant over tools served by an MCP server.
//!
//! The agent first lists its tools, then picks one for the user's query.
//! Trades require explicit confirmation in the prompt rules.

use std::sync::Arc;

use super::configure;
use crate::config::AppConfig;
use crate::crew::{Agent, Crew, Process, Task};
use crate::error::PipelineError;
use crate::tools::AgentTool;
use crate::tools::introspect::ListAttachedTools;

pub const DEFAULT_QUERY: &str = "Give me my portfolio?";

const ROLE: &str = "CryptoTradingAgent";

const GOAL: &str = "Act as an orchestrator: first inspect which MCP tools are attached, then pick the most \
     appropriate tool for the user's query. Capabilities include:\n\
     • Fetch portfolio/balances/positions\n\
     • List tradable Coinbase products\n\
     • Execute trades (ONLY with explicit confirmation)\n\
     • Run tool health checks before critical actions";

const BACKSTORY: &str = "You are a careful trading assistant with strong guardrails. You never fabricate data; you call \
     MCP tools to get facts or perform actions, then summarize results clearly.";

const EXPECTED_OUTPUT: &str = "A clear, final answer stating the chosen tool and the relevant data. \
     For portfolio: per-asset breakdown with totals.";

/// Blank queries fall back to [`DEFAULT_QUERY`].
pub fn normalize_query(words: &[String]) -> String {
    let query = words.join(" ");
    let query = query.trim();
    if query.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        query.to_string()
    }
}

fn task_description(query: &str) -> String {
    format!(
        "User query: \"{query}\"\n\n\
         Follow this strict sequence:\n\
         1) Call `list_attached_tools` ONCE to see what's available.\n\
         2) Decide which tool best satisfies the query, using these rules:\n   \
            • portfolio/balance/holdings → call `get_portfolio` (no args)\n   \
            • products/markets/pairs → call `list_coinbase_products`\n   \
            • buy/sell/execute → call `execute_crypto_trade` BUT FIRST confirm: \
              intent, symbol, side, quantity or quote_size, and price/slippage. \
              If missing, ask one clarifying question and STOP.\n   \
            • health/status → call `tool_health`\n\
         3) After the chosen tool returns, produce a concise summary for the user.\n   \
            - If JSON came back, preserve key structure and show assets, quantities, values.\n   \
            - State which tool you used.\n\
         Never fabricate results; prefer tool outputs as ground truth."
    )
}

/// The introspection tool over `mcp_tools`, followed by the MCP tools themselves.
pub fn toolset(mcp_tools: Vec<Arc<dyn AgentTool>>) -> Vec<Arc<dyn AgentTool>> {
    let mut tools: Vec<Arc<dyn AgentTool>> =
        vec![Arc::new(ListAttachedTools::new(mcp_tools.clone()))];
    tools.extend(mcp_tools);
    tools
}

/// The query is embedded verbatim in a literal task, so the crew takes no inputs.
pub fn crew(config: &AppConfig, mcp_tools: Vec<Arc<dyn AgentTool>>, query: &str) -> Result<Crew, PipelineError> {
    let agent = Agent::new(ROLE, GOAL, BACKSTORY)
        .with_tools(toolset(mcp_tools))
        .with_delegation(false)
        .with_verbose(true);

    let task = Task::new(task_description(query), EXPECTED_OUTPUT, &agent)
        .with_markdown(true)
        .with_literal(true);

    let crew = Crew::new(vec![agent], vec![task], Process::Sequential, None)?;
    Ok(configure(crew, config))
}
