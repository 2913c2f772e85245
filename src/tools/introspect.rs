//! `list_attached_tools`: lets an agent see which tools it has before it
//! picks one.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{AgentTool, no_args_schema};

#[derive(Debug, Serialize)]
struct ToolSpec {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    args_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ToolListing {
    tools: Vec<ToolSpec>,
}

pub struct ListAttachedTools {
    tools: Vec<Arc<dyn AgentTool>>,
}

impl ListAttachedTools {
    pub fn new(tools: Vec<Arc<dyn AgentTool>>) -> Self {
        Self { tools }
    }

    /// Serialize `{"tools": [...]}` with one entry per attached tool.
    pub fn listing(&self) -> String {
        let listing = ToolListing {
            tools: self.tools.iter().map(|t| spec_for(t.as_ref())).collect(),
        };
        serde_json::to_string(&listing)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

fn spec_for(tool: &dyn AgentTool) -> ToolSpec {
    let args_schema = tool.args_schema().and_then(|schema| match schema {
        Value::Null => None,
        Value::Object(ref map) if map.is_empty() => None,
        Value::Object(_) => Some(schema),
        // Anything that is not a JSON schema object is passed through as text.
        other => Some(Value::String(other.to_string())),
    });

    ToolSpec {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        args_schema,
    }
}

#[async_trait]
impl AgentTool for ListAttachedTools {
    fn name(&self) -> &str {
        "list_attached_tools"
    }

    fn description(&self) -> &str {
        "List the tools currently attached to the agent (from the MCP adapter). \
         Call this FIRST to decide which tool to use next."
    }

    fn args_schema(&self) -> Option<Value> {
        Some(no_args_schema())
    }

    async fn run(&self, _args: Value) -> String {
        self.listing()
    }
}
