//! Configuration records for agents, tasks and crews, plus run outputs.
//!
//! Records are constructed once per invocation, validated by [`super::Crew::new`],
//! consumed by one kickoff, and discarded.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::tools::AgentTool;

/// Model selection for one agent (or the manager).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// genai model name; provider is inferred from it (e.g. "gpt-4o-mini").
    pub model: String,
    pub temperature: Option<f64>,
}

impl LlmConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A persona that drives one series of LLM calls.
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<Arc<dyn AgentTool>>,
    /// `None` uses the crew's default model.
    pub llm: Option<LlmConfig>,
    pub allow_delegation: bool,
    /// Tool-calling turns before a final answer is forced. `None` uses the crew default.
    pub max_iter: Option<usize>,
    pub verbose: bool,
}

impl Agent {
    pub fn new(role: impl Into<String>, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            llm: None,
            allow_delegation: false,
            max_iter: None,
            verbose: false,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn AgentTool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("llm", &self.llm)
            .field("allow_delegation", &self.allow_delegation)
            .finish_non_exhaustive()
    }
}

/// A natural-language unit of work assigned to an agent.
#[derive(Debug, Clone)]
pub struct Task {
    /// May contain `{name}` placeholders filled from inputs or earlier output keys.
    pub description: String,
    pub expected_output: String,
    /// Role of the assigned agent.
    pub agent_role: String,
    /// Expose this task's output to later tasks as `{output_key}`.
    pub output_key: Option<String>,
    /// Ask for a Markdown-formatted answer.
    pub markdown: bool,
    /// Use the description as written; braces are text, not placeholders.
    pub literal: bool,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: &Agent,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent_role: agent.role.clone(),
            output_key: None,
            markdown: false,
            literal: false,
        }
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// For descriptions that embed user text, such as JSON in a query.
    pub fn with_literal(mut self, literal: bool) -> Self {
        self.literal = literal;
        self
    }
}

/// How a crew executes its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// Tasks run in list order; each sees the outputs before it.
    Sequential,
    /// A manager agent works each task by delegating to the workers.
    Hierarchical,
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Process::Sequential => f.write_str("sequential"),
            Process::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

/// Output of one completed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    pub description: String,
    pub agent_role: String,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
}

/// Output of a whole crew run. Displays as the final task's text.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
