//! Run events and the observers that consume them.
//!
//! The executor reports every step of a crew run as a [`RunEvent`]. Observers
//! are called synchronously, in registration order: the JSONL
//! [`run_log::RunLogger`], the stderr [`ConsoleObserver`] used for verbose
//! output, and the [`langfuse::LangfuseObserver`].

pub mod langfuse;
pub mod run_log;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::crew::Process;

/// One step of a crew run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        run_id: String,
        process: Process,
        agents: usize,
        tasks: usize,
    },
    TaskStarted {
        task_index: usize,
        agent_role: String,
        description: String,
    },
    LlmRequest {
        agent_role: String,
        model: String,
        turn: usize,
    },
    LlmResponse {
        agent_role: String,
        model: String,
        turn: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        tool_calls: usize,
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    ToolCall {
        agent_role: String,
        call_id: String,
        tool: String,
        arguments: serde_json::Value,
    },
    ToolResult {
        agent_role: String,
        call_id: String,
        tool: String,
        result: String,
    },
    Delegation {
        from_role: String,
        to_role: String,
        request: String,
    },
    TaskCompleted {
        task_index: usize,
        agent_role: String,
        output: String,
    },
    RunCompleted {
        output: String,
    },
    RunFailed {
        error: String,
    },
}

impl RunEvent {
    /// Role of the agent this event belongs to, if any.
    pub fn agent_role(&self) -> Option<&str> {
        match self {
            RunEvent::TaskStarted { agent_role, .. }
            | RunEvent::LlmRequest { agent_role, .. }
            | RunEvent::LlmResponse { agent_role, .. }
            | RunEvent::ToolCall { agent_role, .. }
            | RunEvent::ToolResult { agent_role, .. }
            | RunEvent::TaskCompleted { agent_role, .. } => Some(agent_role),
            RunEvent::Delegation { from_role, .. } => Some(from_role),
            _ => None,
        }
    }
}

pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent);
}

/// Cheaply clonable fan-out over registered observers.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Arc<Vec<Arc<dyn RunObserver>>>,
}

impl Observers {
    pub fn new(observers: Vec<Arc<dyn RunObserver>>) -> Self {
        Self {
            inner: Arc::new(observers),
        }
    }

    pub fn emit(&self, event: RunEvent) {
        for observer in self.inner.iter() {
            observer.on_event(&event);
        }
    }
}

/// Truncate for one-line display, respecting char boundaries.
pub(crate) fn abbreviate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Prints agent steps to stderr. `roles = None` prints every agent.
pub struct ConsoleObserver {
    roles: Option<HashSet<String>>,
}

impl ConsoleObserver {
    pub fn all() -> Self {
        Self { roles: None }
    }

    pub fn for_roles(roles: HashSet<String>) -> Self {
        Self { roles: Some(roles) }
    }

    fn wants(&self, event: &RunEvent) -> bool {
        match (&self.roles, event.agent_role()) {
            (None, _) | (_, None) => true,
            (Some(roles), Some(role)) => roles.contains(role),
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_event(&self, event: &RunEvent) {
        if !self.wants(event) {
            return;
        }
        match event {
            RunEvent::RunStarted { process, agents, tasks, .. } => {
                eprintln!("[crew] {process} process, {agents} agents, {tasks} tasks");
            }
            RunEvent::TaskStarted { task_index, agent_role, description } => {
                eprintln!("[task {}] {agent_role}: {}", task_index + 1, abbreviate(description, 120));
            }
            RunEvent::LlmResponse { agent_role, text: Some(text), .. } => {
                eprintln!("[{agent_role}] {}", abbreviate(text, 300));
            }
            RunEvent::ToolCall { tool, arguments, .. } => {
                eprintln!("[tool] {tool}({})", abbreviate(&arguments.to_string(), 100));
            }
            RunEvent::ToolResult { result, .. } => {
                eprintln!("[result] {}", abbreviate(result, 200));
            }
            RunEvent::Delegation { from_role, to_role, request } => {
                eprintln!("[delegate] {from_role} -> {to_role}: {}", abbreviate(request, 120));
            }
            RunEvent::TaskCompleted { task_index, agent_role, .. } => {
                eprintln!("[task {}] {agent_role} done", task_index + 1);
            }
            RunEvent::RunFailed { error } => {
                eprintln!("[error] {error}");
            }
            _ => {}
        }
    }
}
