//! Research a topic with the Wikipedia tool, then rewrite the summary in a
//! lighter tone.

use std::collections::HashMap;
use std::sync::Arc;

use super::{configure, worker_llm};
use crate::config::AppConfig;
use crate::crew::{Agent, Crew, Process, Task};
use crate::error::PipelineError;
use crate::tools::AgentTool;
use crate::tools::wiki::WikiSummaryTool;

pub const DEFAULT_TOPIC: &str = "Moon landing";

pub fn crew(config: &AppConfig) -> Result<Crew, PipelineError> {
    let wiki: Arc<dyn AgentTool> = Arc::new(WikiSummaryTool::new(
        &config.wikipedia_endpoint,
        config.wikipedia_timeout,
    ));

    let research_agent = Agent::new(
        "Research Agent",
        "Summarize a topic accurately using trusted sources.",
        "You are great at finding and summarizing topics. Prefer the wiki_summary tool when possible.",
    )
    .with_tools(vec![wiki])
    .with_llm(worker_llm(config, 0.0))
    .with_verbose(true);

    let writer_agent = Agent::new(
        "Creative Writer",
        "Rewrite summaries into a fun, engaging style.",
        "You make any piece of text interesting and easy to read.",
    )
    .with_llm(worker_llm(config, 0.7))
    .with_verbose(true);

    let research_task = Task::new(
        "Research about {topic} and provide a short, accurate summary. Use `wiki_summary` tool if possible.",
        "A factual summary (3-5 sentences).",
        &research_agent,
    )
    .with_output_key("previous_summary");

    let rewrite_task = Task::new(
        "Rewrite the following summary in a fun, engaging tone while keeping the facts intact:\n\n{previous_summary}",
        "A fun, engaging rewritten summary.",
        &writer_agent,
    );

    let crew = Crew::new(
        vec![research_agent, writer_agent],
        vec![research_task, rewrite_task],
        Process::Sequential,
        None,
    )?;
    Ok(configure(crew, config))
}

pub fn inputs(topic: &str) -> HashMap<String, String> {
    HashMap::from([("topic".to_string(), topic.to_string())])
}
