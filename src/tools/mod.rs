//! Tools an agent may call while executing a task.
//!
//! Every tool implements [`AgentTool`]. The executor converts a [`ToolBox`]
//! into [`genai::chat::Tool`] schemas for the request and routes the model's
//! tool calls back by name.
//!
//! Tool errors are always returned as strings (never `Err` variants) so the
//! model can observe the error and react.

pub mod introspect;
pub mod mcp;
pub mod wiki;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use genai::chat::Tool;
use serde_json::{Value, json};

/// An external callable that an agent may invoke during task execution.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object, if the tool takes any.
    fn args_schema(&self) -> Option<Value> {
        None
    }

    /// Run the tool. Failures are reported in the returned text.
    async fn run(&self, args: Value) -> String;
}

/// Empty-object schema for tools that take no input.
pub fn no_args_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Name-indexed set of tools available to one agent for one task.
#[derive(Clone, Default)]
pub struct ToolBox {
    tools: BTreeMap<String, Arc<dyn AgentTool>>,
    order: Vec<String>,
}

impl ToolBox {
    pub fn new<I>(tools: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn AgentTool>>,
    {
        let mut toolbox = Self::default();
        for tool in tools {
            toolbox.insert(tool);
        }
        toolbox
    }

    /// Add a tool. A later tool with the same name replaces the earlier one.
    pub fn insert(&mut self, tool: Arc<dyn AgentTool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AgentTool>> {
        self.tools.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Tools in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AgentTool>> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Convert to genai tool schemas for a chat request.
    pub fn to_genai_tools(&self) -> Vec<Tool> {
        self.iter()
            .map(|tool| {
                Tool::new(tool.name())
                    .with_description(tool.description())
                    .with_schema(tool.args_schema().unwrap_or_else(no_args_schema))
            })
            .collect()
    }

    /// Human-readable listing embedded in the agent's system prompt.
    pub fn descriptions(&self) -> String {
        self.iter()
            .map(|tool| format!("- {}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Route a tool call to its implementation.
    ///
    /// Unknown tools produce a JSON error object listing what is available.
    pub async fn dispatch(&self, call: &genai::chat::ToolCall) -> String {
        match self.get(&call.fn_name) {
            Some(tool) => tool.run(call.fn_arguments.clone()).await,
            None => json!({
                "error": format!("Unknown tool: {}", call.fn_name),
                "available": self.order,
            })
            .to_string(),
        }
    }
}

/// Pull a required string argument out of a tool's JSON arguments.
pub fn string_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Tool that echoes its arguments, for dispatch tests.
    pub struct EchoTool {
        pub name: String,
    }

    #[async_trait]
    impl AgentTool for EchoTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        async fn run(&self, args: Value) -> String {
            format!("{}:{}", self.name, args)
        }
    }

    pub fn echo(name: &str) -> Arc<dyn AgentTool> {
        Arc::new(EchoTool { name: name.to_string() })
    }
}
