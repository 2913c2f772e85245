//! Crew validation and kickoff.
//!
//! [`Crew::new`] checks the declared configuration once. [`Crew::kickoff`]
//! checks that every task placeholder can be filled, then runs the tasks
//! in the crew's [`Process`] and returns a [`CrewOutput`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::delegation::coworker_tools;
use super::executor::{Runtime, execute_agent};
use super::llm::{ChatBackend, GenaiBackend};
use super::prompts::{MANAGER_BACKSTORY, MANAGER_GOAL, MANAGER_ROLE, join_context, task_prompt};
use super::template::{interpolate, placeholders};
use super::types::{Agent, CrewOutput, LlmConfig, Process, Task, TaskOutput};
use crate::error::PipelineError;
use crate::observe::{ConsoleObserver, Observers, RunEvent, RunObserver};
use crate::tools::ToolBox;

const DEFAULT_MAX_ITER: usize = 25;

pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    process: Process,
    manager_llm: Option<LlmConfig>,
    default_llm: LlmConfig,
    max_iter: Option<usize>,
    verbose: bool,
    backend: Arc<dyn ChatBackend>,
    observers: Vec<Arc<dyn RunObserver>>,
}

fn require(value: &str, entity: &'static str, field: &'static str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::EmptyField { entity, field });
    }
    Ok(())
}

impl Crew {
    /// Validate and assemble a crew.
    ///
    /// `manager_llm` is required for [`Process::Hierarchical`] and ignored otherwise.
    pub fn new(
        agents: Vec<Agent>,
        tasks: Vec<Task>,
        process: Process,
        manager_llm: Option<LlmConfig>,
    ) -> Result<Self, PipelineError> {
        if agents.is_empty() {
            return Err(PipelineError::Empty("agent"));
        }
        if tasks.is_empty() {
            return Err(PipelineError::Empty("task"));
        }

        let mut roles = HashSet::new();
        for agent in &agents {
            require(&agent.role, "Agent", "role")?;
            require(&agent.goal, "Agent", "goal")?;
            require(&agent.backstory, "Agent", "backstory")?;
            if !roles.insert(agent.role.as_str()) {
                return Err(PipelineError::DuplicateRole(agent.role.clone()));
            }
        }

        let mut keys = HashSet::new();
        for task in &tasks {
            require(&task.description, "Task", "description")?;
            require(&task.expected_output, "Task", "expected_output")?;
            if !roles.contains(task.agent_role.as_str()) {
                return Err(PipelineError::UnknownAgent {
                    task: task.description.chars().take(60).collect(),
                    role: task.agent_role.clone(),
                });
            }
            if let Some(key) = &task.output_key {
                require(key, "Task", "output_key")?;
                if !keys.insert(key.as_str()) {
                    return Err(PipelineError::DuplicateOutputKey(key.clone()));
                }
            }
        }

        if process == Process::Hierarchical && manager_llm.is_none() {
            return Err(PipelineError::MissingManager);
        }

        Ok(Self {
            agents,
            tasks,
            process,
            manager_llm,
            default_llm: LlmConfig::new(crate::config::merge::DEFAULT_MODEL),
            max_iter: None,
            verbose: false,
            backend: Arc::new(GenaiBackend::default()),
            observers: Vec::new(),
        })
    }

    /// Model used by agents that do not set their own.
    pub fn with_default_llm(mut self, llm: LlmConfig) -> Self {
        self.default_llm = llm;
        self
    }

    /// Iteration cap for agents (and the manager) that do not set their own.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Print every agent's steps, not only agents marked verbose.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Model the generated manager runs on, for hierarchical crews.
    pub fn manager_llm(&self) -> Option<&LlmConfig> {
        self.manager_llm.as_ref()
    }

    pub fn max_iter(&self) -> Option<usize> {
        self.max_iter
    }

    /// Every model this crew may call: agent overrides, the worker default
    /// and the manager. Duplicates are removed, first occurrence wins.
    pub fn models(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.agents
            .iter()
            .filter_map(|a| a.llm.as_ref())
            .chain(std::iter::once(&self.default_llm))
            .chain(self.manager_llm.as_ref().filter(|_| self.process == Process::Hierarchical))
            .map(|llm| llm.model.as_str())
            .filter(|model| seen.insert(*model))
            .collect()
    }

    /// Every placeholder must be an input or an output key of an earlier task.
    fn check_inputs(&self, inputs: &HashMap<String, String>) -> Result<(), PipelineError> {
        let mut available: HashSet<&str> = inputs.keys().map(String::as_str).collect();
        for task in self.tasks.iter().filter(|t| !t.literal) {
            if let Some(name) = placeholders(&task.description)
                .into_iter()
                .find(|n| !available.contains(n.as_str()))
            {
                return Err(PipelineError::MissingInput { name });
            }
            if let Some(key) = &task.output_key {
                available.insert(key);
            }
        }
        Ok(())
    }

    fn runtime(&self) -> Runtime {
        let mut observers = self.observers.clone();
        let console: Option<Arc<dyn RunObserver>> = if self.verbose {
            Some(Arc::new(ConsoleObserver::all()))
        } else {
            let roles: HashSet<String> = self
                .agents
                .iter()
                .filter(|a| a.verbose)
                .map(|a| a.role.clone())
                .collect();
            (!roles.is_empty()).then(|| Arc::new(ConsoleObserver::for_roles(roles)) as Arc<dyn RunObserver>)
        };
        observers.extend(console);

        Runtime {
            backend: self.backend.clone(),
            observers: Observers::new(observers),
            default_llm: self.default_llm.clone(),
            default_max_iter: self.max_iter.unwrap_or(DEFAULT_MAX_ITER),
        }
    }

    /// Run all tasks and return the crew's output.
    ///
    /// Placeholder checks happen before any task starts, so a missing input
    /// never costs an LLM call.
    pub async fn kickoff(&self, inputs: HashMap<String, String>) -> Result<CrewOutput, PipelineError> {
        self.check_inputs(&inputs)?;

        let runtime = self.runtime();
        let run_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(%run_id, process = %self.process, tasks = self.tasks.len(), "Crew kickoff");

        runtime.observers.emit(RunEvent::RunStarted {
            run_id,
            process: self.process,
            agents: self.agents.len(),
            tasks: self.tasks.len(),
        });

        let result = match self.process {
            Process::Sequential => self.run_sequential(&runtime, inputs).await,
            Process::Hierarchical => self.run_hierarchical(&runtime, inputs).await,
        };

        match &result {
            Ok(output) => runtime.observers.emit(RunEvent::RunCompleted {
                output: output.raw.clone(),
            }),
            Err(e) => {
                tracing::error!("Crew run failed: {e}");
                runtime.observers.emit(RunEvent::RunFailed { error: e.to_string() });
            }
        }
        result
    }

    fn agent(&self, role: &str) -> &Agent {
        // Crew::new guarantees every task's role is present.
        self.agents
            .iter()
            .find(|a| a.role == role)
            .unwrap_or(&self.agents[0])
    }

    async fn run_sequential(
        &self,
        runtime: &Runtime,
        mut vars: HashMap<String, String>,
    ) -> Result<CrewOutput, PipelineError> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (index, task) in self.tasks.iter().enumerate() {
            let agent = self.agent(&task.agent_role);
            let description = describe(task, &vars)?;

            let mut tools = ToolBox::new(agent.tools.iter().cloned());
            if agent.allow_delegation {
                let coworkers: Vec<Agent> = self
                    .agents
                    .iter()
                    .filter(|a| a.role != agent.role)
                    .cloned()
                    .collect();
                if !coworkers.is_empty() {
                    for tool in coworker_tools(&agent.role, coworkers, runtime.clone()).iter() {
                        tools.insert(tool.clone());
                    }
                }
            }

            let context = join_context(outputs.iter().map(|o| o.raw.as_str()));
            let prompt = task_prompt(&description, &task.expected_output, context.as_deref(), task.markdown);

            let output = self
                .run_task(runtime, index, agent, &tools, &description, prompt)
                .await?;

            if let Some(key) = &task.output_key {
                vars.insert(key.clone(), output.clone());
            }
            outputs.push(TaskOutput {
                description,
                agent_role: agent.role.clone(),
                raw: output,
                output_key: task.output_key.clone(),
            });
        }

        Ok(finish(outputs))
    }

    async fn run_hierarchical(
        &self,
        runtime: &Runtime,
        mut vars: HashMap<String, String>,
    ) -> Result<CrewOutput, PipelineError> {
        let mut manager = Agent::new(MANAGER_ROLE, MANAGER_GOAL, MANAGER_BACKSTORY)
            .with_verbose(self.verbose);
        manager.llm = self.manager_llm.clone();

        let tools = coworker_tools(MANAGER_ROLE, self.agents.clone(), runtime.clone());
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (index, task) in self.tasks.iter().enumerate() {
            let description = describe(task, &vars)?;
            let hint = format!(
                "{description}\n\nSuggested coworker for this task: {}. Delegate to whoever fits best.",
                task.agent_role
            );
            let context = join_context(outputs.iter().map(|o| o.raw.as_str()));
            let prompt = task_prompt(&hint, &task.expected_output, context.as_deref(), task.markdown);

            let output = self
                .run_task(runtime, index, &manager, &tools, &description, prompt)
                .await?;

            if let Some(key) = &task.output_key {
                vars.insert(key.clone(), output.clone());
            }
            outputs.push(TaskOutput {
                description,
                agent_role: manager.role.clone(),
                raw: output,
                output_key: task.output_key.clone(),
            });
        }

        Ok(finish(outputs))
    }

    async fn run_task(
        &self,
        runtime: &Runtime,
        index: usize,
        agent: &Agent,
        tools: &ToolBox,
        description: &str,
        prompt: String,
    ) -> Result<String, PipelineError> {
        runtime.observers.emit(RunEvent::TaskStarted {
            task_index: index,
            agent_role: agent.role.clone(),
            description: description.to_string(),
        });

        let output = execute_agent(runtime, agent, tools, prompt)
            .await
            .map_err(|source| PipelineError::Agent {
                role: agent.role.clone(),
                source,
            })?;

        runtime.observers.emit(RunEvent::TaskCompleted {
            task_index: index,
            agent_role: agent.role.clone(),
            output: output.clone(),
        });
        Ok(output)
    }
}

fn describe(task: &Task, vars: &HashMap<String, String>) -> Result<String, PipelineError> {
    if task.literal {
        return Ok(task.description.clone());
    }
    interpolate(&task.description, vars)
}

fn finish(tasks_output: Vec<TaskOutput>) -> CrewOutput {
    let raw = tasks_output.last().map(|o| o.raw.clone()).unwrap_or_default();
    CrewOutput { raw, tasks_output }
}
