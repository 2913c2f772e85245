//! Agent crews: configuration records, the agent loop, and the two
//! execution processes.
//!
//! A [`Crew`] owns its agents and tasks. `kickoff` runs the tasks either in
//! list order ([`Process::Sequential`]) or through a generated manager agent
//! that delegates to the workers ([`Process::Hierarchical`]).

pub mod delegation;
pub mod executor;
pub mod llm;
pub mod prompts;
pub mod runner;
pub mod template;
pub mod types;

pub use llm::{ChatBackend, ChatTurn, GenaiBackend, TokenUsage};
pub use runner::Crew;
pub use types::{Agent, CrewOutput, LlmConfig, Process, Task, TaskOutput};

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use genai::chat::{ChatRequest, ToolCall};

    use super::llm::{ChatBackend, ChatTurn};
    use crate::error::LlmError;

    /// One request as seen by the scripted backend.
    #[derive(Clone)]
    pub struct Recorded {
        pub model: String,
        pub temperature: Option<f64>,
        pub request: ChatRequest,
        /// `Debug` rendering of the request, for substring assertions.
        pub debug: String,
    }

    /// Replays canned turns in order and records every request.
    pub struct ScriptedBackend {
        turns: Mutex<VecDeque<ChatTurn>>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl ScriptedBackend {
        pub fn new(turns: Vec<ChatTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
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
            self.requests.lock().unwrap().push(Recorded {
                model: model.to_string(),
                temperature,
                debug: format!("{request:?}"),
                request,
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
}
