mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{Recorder, ScriptedBackend, agent, tool_call};
use crewrun::crew::{ChatTurn, Crew, LlmConfig, Process, Task};
use crewrun::observe::RunEvent;
use serde_json::json;

fn garage(backend: Arc<ScriptedBackend>) -> Crew {
    let (oil, tire) = (agent("Oil Specialist"), agent("Tire Specialist"));
    let task = Task::new("Car feels bumpy. Advise.", "Advice", &oil);
    Crew::new(
        vec![oil, tire],
        vec![task],
        Process::Hierarchical,
        Some(LlmConfig::new("manager-model")),
    )
    .unwrap()
    .with_default_llm(LlmConfig::new("worker-model"))
    .with_backend(backend)
}

// ============================================================
// Delegation
// ============================================================

#[tokio::test]
async fn test_manager_delegates_to_named_worker() {
    let backend = ScriptedBackend::new(vec![
        ChatTurn::tool_calls(vec![tool_call(
            "call-1",
            "delegate_work_to_coworker",
            json!({"task": "Check tire wear", "context": "Bumpy ride at speed", "coworker": "tire specialist"}),
        )]),
        ChatTurn::text("Rotate and balance the tires."),
        ChatTurn::text("Final: rotate and balance the tires."),
    ]);
    let recorder = Recorder::new();
    let crew = garage(backend.clone()).with_observer(recorder.clone());

    let output = crew.kickoff(HashMap::new()).await.unwrap();

    assert_eq!(output.raw, "Final: rotate and balance the tires.");
    assert_eq!(output.tasks_output[0].agent_role, "Crew Manager");

    let sent = backend.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].model, "manager-model");
    assert!(sent[0].prompt.contains("Crew Manager"));
    assert!(sent[0].prompt.contains("Oil Specialist, Tire Specialist"));
    assert_eq!(sent[1].model, "worker-model");
    assert!(sent[1].prompt.contains("Check tire wear"));
    assert!(sent[1].prompt.contains("Bumpy ride at speed"));
    assert!(sent[2].prompt.contains("Rotate and balance the tires."));

    let delegations: Vec<(String, String)> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            RunEvent::Delegation { from_role, to_role, .. } => Some((from_role, to_role)),
            _ => None,
        })
        .collect();
    assert_eq!(
        delegations,
        vec![("Crew Manager".to_string(), "Tire Specialist".to_string())]
    );
}

#[tokio::test]
async fn test_unknown_coworker_error_goes_back_to_manager() {
    let backend = ScriptedBackend::new(vec![
        ChatTurn::tool_calls(vec![tool_call(
            "call-1",
            "ask_question_to_coworker",
            json!({"question": "Which oil?", "context": "", "coworker": "Mechanic"}),
        )]),
        ChatTurn::text("Answered without help."),
    ]);
    let crew = garage(backend.clone());

    let output = crew.kickoff(HashMap::new()).await.unwrap();

    assert_eq!(output.raw, "Answered without help.");
    let sent = backend.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].prompt.contains("not found"));
    assert!(sent.iter().all(|s| s.model == "manager-model"));
}

#[tokio::test]
async fn test_crew_max_iter_limits_the_manager() {
    let backend = ScriptedBackend::new(vec![
        ChatTurn::tool_calls(vec![tool_call(
            "call-1",
            "delegate_work_to_coworker",
            json!({"task": "Check oil", "context": "Noise", "coworker": "Oil Specialist"}),
        )]),
        ChatTurn::text("Oil is fine."),
        ChatTurn::text("Summary: oil is fine."),
    ]);
    let crew = garage(backend.clone()).with_max_iter(1);

    let output = crew.kickoff(HashMap::new()).await.unwrap();

    assert_eq!(output.raw, "Summary: oil is fine.");
    let sent = backend.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].has_tools);
    assert!(!sent[2].has_tools);
}

#[tokio::test]
async fn test_sequential_agent_with_delegation_reaches_coworker() {
    let backend = ScriptedBackend::new(vec![
        ChatTurn::tool_calls(vec![tool_call(
            "call-1",
            "ask_question_to_coworker",
            json!({"question": "Is the draft accurate?", "context": "Draft: the Moon is cheese.", "coworker": "Reviewer"}),
        )]),
        ChatTurn::text("No, it is rock."),
        ChatTurn::text("The Moon is rock."),
    ]);
    let writer = agent("Writer").with_delegation(true);
    let reviewer = agent("Reviewer");
    let task = Task::new("Write about the Moon", "One sentence", &writer);
    let crew = Crew::new(vec![writer, reviewer], vec![task], Process::Sequential, None)
        .unwrap()
        .with_backend(backend.clone());

    let output = crew.kickoff(HashMap::new()).await.unwrap();

    assert_eq!(output.raw, "The Moon is rock.");
    assert_eq!(output.tasks_output[0].agent_role, "Writer");
    assert!(backend.sent()[1].prompt.contains("Is the draft accurate?"));
}
