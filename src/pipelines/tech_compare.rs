//! Hierarchical technology comparison. A single top-level task is handed to
//! the manager, which decomposes it across researcher, comparator and editor.

use std::collections::HashMap;
use std::sync::Arc;

use super::{configure, worker_llm};
use crate::config::AppConfig;
use crate::crew::{Agent, Crew, LlmConfig, Process, Task};
use crate::error::PipelineError;
use crate::tools::AgentTool;
use crate::tools::wiki::CannedSummaryTool;

pub const DEFAULT_TECH_A: &str = "Flask";
pub const DEFAULT_TECH_B: &str = "FastAPI";
const MAX_ITER: usize = 3;

pub fn crew(config: &AppConfig) -> Result<Crew, PipelineError> {
    let llm = worker_llm(config, 0.0);
    let manager_llm = LlmConfig::new(config.manager_model.as_deref().unwrap_or(&config.model))
        .with_temperature(0.0);

    let summaries: Arc<dyn AgentTool> = Arc::new(CannedSummaryTool::web_frameworks());

    let researcher = Agent::new(
        "Technology Researcher",
        "Find accurate, concise facts about a single technology. \
         Prefer the wiki_summary tool; keep notes short (5-7 bullets).",
        "You are precise and pragmatic. You gather only the most useful facts \
         an engineer would care about (what it is, typical use, key strengths/limits).",
    )
    .with_tools(vec![summaries])
    .with_llm(llm.clone())
    .with_verbose(true);

    let comparator = Agent::new(
        "Technology Comparator",
        "Create a compact comparison and practical recommendation for a specific use case.",
        "You turn two sets of notes into a side-by-side comparison table and then pick \
         one option with a brief rationale, focusing on developer experience and common trade-offs.",
    )
    .with_llm(llm.clone())
    .with_verbose(true);

    let editor = Agent::new(
        "Technical Editor",
        "Polish for clarity and brevity without changing facts.",
        "You trim fluff, tighten language, and keep the output scannable.",
    )
    .with_llm(llm)
    .with_verbose(true);

    // The assigned agent is only a hint; the manager delegates.
    let top_level_task = Task::new(
        "Compare {tech_a} vs {tech_b} for beginner-friendly web projects.\n\n\
         Do this process (you may refine it):\n\
         1) Research {tech_a}: gather 5-7 bullet facts using wiki_summary first.\n\
         2) Research {tech_b}: gather 5-7 bullet facts using wiki_summary first.\n\
         3) Build a concise comparison:\n   \
            - A 5-7 row table (Criteria | {tech_a} | {tech_b})\n   \
            - A short recommendation (2-4 sentences) with trade-offs.\n\
         4) Let the Technical Editor polish the final draft.",
        "A short report containing:\n\
         - Bullet notes for each technology\n\
         - A compact comparison table\n\
         - A brief recommendation",
        &researcher,
    );

    let crew = Crew::new(
        vec![researcher, comparator, editor],
        vec![top_level_task],
        Process::Hierarchical,
        Some(manager_llm),
    )?;
    Ok(configure(crew, config).with_max_iter(MAX_ITER))
}

pub fn inputs(tech_a: &str, tech_b: &str) -> HashMap<String, String> {
    HashMap::from([
        ("tech_a".to_string(), tech_a.to_string()),
        ("tech_b".to_string(), tech_b.to_string()),
    ])
}
