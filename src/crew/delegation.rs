//! Coworker tools: delegate work to, or ask a question of, another agent.
//!
//! The generated manager in a hierarchical crew gets both tools over every
//! worker. In a sequential crew, an agent with `allow_delegation` gets them
//! over the other agents. The coworker runs its own agent loop with its own
//! tools only, so delegation never nests.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::executor::{Runtime, execute_agent};
use super::prompts::{COWORKER_EXPECTED_OUTPUT, task_prompt};
use super::types::Agent;
use crate::observe::RunEvent;
use crate::tools::{AgentTool, ToolBox, string_arg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoworkerRequest {
    Delegate,
    Ask,
}

impl CoworkerRequest {
    fn request_field(self) -> &'static str {
        match self {
            CoworkerRequest::Delegate => "task",
            CoworkerRequest::Ask => "question",
        }
    }
}

/// One of the two coworker tools, bound to a fixed set of coworkers.
pub struct CoworkerTool {
    kind: CoworkerRequest,
    from_role: String,
    coworkers: Vec<Agent>,
    runtime: Runtime,
    description: String,
}

/// Build `delegate_work_to_coworker` and `ask_question_to_coworker` for
/// `from_role` over `coworkers`.
pub fn coworker_tools(from_role: &str, coworkers: Vec<Agent>, runtime: Runtime) -> ToolBox {
    let roles = coworkers
        .iter()
        .map(|a| a.role.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let delegate = CoworkerTool {
        kind: CoworkerRequest::Delegate,
        from_role: from_role.to_string(),
        coworkers: coworkers.clone(),
        runtime: runtime.clone(),
        description: format!(
            "Delegate a specific task to one of the following coworkers: {roles}. \
             The input to this tool should be the coworker, the task you want them to do, \
             and ALL necessary context to execute the task; they know nothing about the \
             task, so share absolutely everything you know, don't reference things but \
             instead explain them."
        ),
    };
    let ask = CoworkerTool {
        kind: CoworkerRequest::Ask,
        from_role: from_role.to_string(),
        coworkers,
        runtime,
        description: format!(
            "Ask a specific question to one of the following coworkers: {roles}. \
             The input to this tool should be the coworker, the question you have for them, \
             and ALL necessary context to ask the question properly; they know nothing about \
             the question, so share absolutely everything you know, don't reference things \
             but instead explain them."
        ),
    };

    ToolBox::new([
        std::sync::Arc::new(delegate) as std::sync::Arc<dyn AgentTool>,
        std::sync::Arc::new(ask),
    ])
}

/// Case-insensitive role match, tolerating stray quotes and whitespace.
fn find_coworker<'a>(coworkers: &'a [Agent], requested: &str) -> Option<&'a Agent> {
    let wanted = requested.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_lowercase();
    coworkers.iter().find(|a| a.role.to_lowercase() == wanted)
}

impl CoworkerTool {
    async fn handle(&self, args: &Value) -> Result<String, String> {
        let field = self.kind.request_field();
        let request = string_arg(args, field)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("missing '{field}' argument"))?;
        let context = string_arg(args, "context").unwrap_or_default();
        let requested = string_arg(args, "coworker").unwrap_or_default();

        let coworker = find_coworker(&self.coworkers, requested).ok_or_else(|| {
            let valid = self
                .coworkers
                .iter()
                .map(|a| a.role.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("coworker '{requested}' not found; choose one of: {valid}")
        })?;

        self.runtime.observers.emit(RunEvent::Delegation {
            from_role: self.from_role.clone(),
            to_role: coworker.role.clone(),
            request: request.to_string(),
        });

        let prompt = task_prompt(request, COWORKER_EXPECTED_OUTPUT, Some(context), false);
        let tools = ToolBox::new(coworker.tools.iter().cloned());

        execute_agent(&self.runtime, coworker, &tools, prompt)
            .await
            .map_err(|e| format!("{} failed: {e}", coworker.role))
    }
}

#[async_trait]
impl AgentTool for CoworkerTool {
    fn name(&self) -> &str {
        match self.kind {
            CoworkerRequest::Delegate => "delegate_work_to_coworker",
            CoworkerRequest::Ask => "ask_question_to_coworker",
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn args_schema(&self) -> Option<Value> {
        let field = self.kind.request_field();
        let mut properties = serde_json::Map::new();
        properties.insert(
            field.to_string(),
            json!({ "type": "string", "description": format!("The {field} for the coworker") }),
        );
        properties.insert(
            "context".to_string(),
            json!({ "type": "string", "description": "Everything the coworker needs to know" }),
        );
        properties.insert(
            "coworker".to_string(),
            json!({ "type": "string", "description": "Role of the coworker" }),
        );
        Some(json!({
            "type": "object",
            "properties": properties,
            "required": [field, "context", "coworker"]
        }))
    }

    async fn run(&self, args: Value) -> String {
        match self.handle(&args).await {
            Ok(answer) => answer,
            Err(e) => json!({ "error": format!("{}: {e}", self.name()) }).to_string(),
        }
    }
}
