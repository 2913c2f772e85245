//! Research, write, review: a three-step sequential crew reported to Langfuse.

use std::collections::HashMap;

use serde_json::Value;

use super::configure;
use crate::config::AppConfig;
use crate::crew::{Agent, Crew, Process, Task};
use crate::error::PipelineError;
use crate::observe::langfuse::TraceMeta;

pub const DEFAULT_TOPIC: &str = "Langfuse + agent pipelines";
pub const TRACE_NAME: &str = "crew-sequential-demo";

pub fn crew(config: &AppConfig, topic: &str) -> Result<Crew, PipelineError> {
    let researcher = Agent::new(
        "Researcher",
        format!("Find 3 recent, credible facts about '{topic}'."),
        "Senior analyst skilled at fast, reliable web research.",
    );
    let writer = Agent::new(
        "Writer",
        "Turn notes into a crisp, well-structured summary (120-180 words).",
        "Clear communicator who values accuracy and brevity.",
    );
    let reviewer = Agent::new(
        "Reviewer",
        "Check the summary for correctness, duplication, and clarity; suggest tight edits.",
        "Editorial reviewer with an eye for factual consistency.",
    );

    let research = Task::new(
        "Gather 3 recent, credible facts about the topic. \
         Return bullet points with source names (no links needed).",
        "3 bullet points with sources.",
        &researcher,
    );
    let draft = Task::new(
        "Using the research bullets, write a 120-180 word summary with a 1-line headline.",
        "Headline + concise summary.",
        &writer,
    );
    let review = Task::new(
        "Review the draft. If issues exist, rewrite the summary concisely; \
         otherwise approve with a one-line note.",
        "Approved + one-line note",
        &reviewer,
    );

    let crew = Crew::new(
        vec![researcher, writer, reviewer],
        vec![research, draft, review],
        Process::Sequential,
        None,
    )?;
    Ok(configure(crew, config).with_verbose(true))
}

/// Recorded as the trace input.
pub fn inputs(topic: &str) -> HashMap<String, String> {
    HashMap::from([("topic".to_string(), topic.to_string())])
}

pub fn trace_meta(config: &AppConfig) -> TraceMeta {
    let mut meta = TraceMeta::new(TRACE_NAME);
    meta.user_id = config.langfuse_user_id.clone();
    meta.session_id = config.langfuse_session_id.clone();
    meta.version = config.langfuse_release.clone();
    meta.tags = ["demo", "sequential", "crew"].map(String::from).to_vec();
    meta.metadata
        .insert("model".to_string(), Value::String(config.model.clone()));
    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::test_config;

    #[test]
    fn topic_lands_in_researcher_goal() {
        let crew = crew(&test_config(), "Rust async").unwrap();
        assert_eq!(crew.agents()[0].goal, "Find 3 recent, credible facts about 'Rust async'.");
        assert_eq!(crew.tasks().len(), 3);
        assert_eq!(crew.process(), Process::Sequential);
    }

    #[test]
    fn trace_meta_from_config() {
        let meta = trace_meta(&test_config());
        assert_eq!(meta.user_id, "user_123");
        assert_eq!(meta.session_id, "sess_abc");
        assert_eq!(meta.version, "v0.1.0");
        assert_eq!(meta.tags, vec!["demo", "sequential", "crew"]);
    }
}
