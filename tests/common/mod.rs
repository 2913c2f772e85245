#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crewrun::crew::{Agent, ChatBackend, ChatTurn};
use crewrun::error::LlmError;
use crewrun::observe::{RunEvent, RunObserver};
use genai::chat::{ChatRequest, ToolCall};

// ─── Scripted backend ─────────────────────────────────────────────────

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Sent {
    pub model: String,
    pub temperature: Option<f64>,
    /// `Debug` rendering of the whole request, for substring checks.
    pub prompt: String,
    pub has_tools: bool,
}

/// Replays canned turns in order. An exhausted script is a request error.
pub struct ScriptedBackend {
    turns: Mutex<VecDeque<ChatTurn>>,
    sent: Mutex<Vec<Sent>>,
}

impl ScriptedBackend {
    pub fn new(turns: Vec<ChatTurn>) -> Arc<Self> {
        Arc::new(Self {
            turns: Mutex::new(turns.into()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(
        &self,
        model: &str,
        request: ChatRequest,
        temperature: Option<f64>,
    ) -> Result<ChatTurn, LlmError> {
        self.sent.lock().unwrap().push(Sent {
            model: model.to_string(),
            temperature,
            prompt: format!("{request:?}"),
            has_tools: request.tools.as_ref().is_some_and(|t| !t.is_empty()),
        });
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Request("script exhausted".to_string()))
    }
}

pub fn tool_call(id: &str, name: &str, args: serde_json::Value) -> ToolCall {
    ToolCall {
        call_id: id.to_string(),
        fn_name: name.to_string(),
        fn_arguments: args,
        thought_signatures: None,
    }
}

// ─── Event recorder ───────────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<RunEvent>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl RunObserver for Recorder {
    fn on_event(&self, event: &RunEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────

pub fn agent(role: &str) -> Agent {
    Agent::new(role, format!("{role} goal"), format!("{role} backstory"))
}
