//! Agent loop: drives one agent through one task prompt.
//!
//! The loop:
//!
//! 1. Builds the system prompt from the agent's persona and tools
//! 2. Sends the task prompt with the tool schemas attached
//! 3. Dispatches every tool call and appends the tool responses
//! 4. Repeats until the model answers with text and no tool calls
//! 5. After `max_iter` tool turns, withholds tools and demands a final answer
//!
//! Each step is reported to the run observers.

use std::sync::Arc;

use genai::chat::{ChatMessage, ChatRequest, ToolResponse};

use super::llm::{ChatBackend, ChatTurn};
use super::prompts::{FORCE_FINAL_ANSWER, agent_system_prompt};
use super::types::{Agent, LlmConfig};
use crate::error::LlmError;
use crate::observe::{Observers, RunEvent};
use crate::tools::ToolBox;

/// Shared execution state handed to the executor and delegation tools.
#[derive(Clone)]
pub struct Runtime {
    pub backend: Arc<dyn ChatBackend>,
    pub observers: Observers,
    /// Used by agents without their own LLM config.
    pub default_llm: LlmConfig,
    /// Used by agents without their own `max_iter`.
    pub default_max_iter: usize,
}

impl Runtime {
    fn llm_for(&self, agent: &Agent) -> LlmConfig {
        agent.llm.clone().unwrap_or_else(|| self.default_llm.clone())
    }

    fn max_iter_for(&self, agent: &Agent) -> usize {
        agent.max_iter.unwrap_or(self.default_max_iter).max(1)
    }
}

/// Run `agent` on `task_prompt` with `tools` and return its final answer.
pub async fn execute_agent(
    runtime: &Runtime,
    agent: &Agent,
    tools: &ToolBox,
    task_prompt: String,
) -> Result<String, LlmError> {
    let llm = runtime.llm_for(agent);
    let max_iter = runtime.max_iter_for(agent);

    let mut chat_req = ChatRequest::from_system(agent_system_prompt(agent, tools))
        .append_message(ChatMessage::user(task_prompt));
    if !tools.is_empty() {
        chat_req = chat_req.with_tools(tools.to_genai_tools());
    }

    for turn in 1..=max_iter {
        let reply = call_model(runtime, agent, &llm, chat_req.clone(), turn).await?;

        if reply.tool_calls.is_empty() {
            return reply.text.ok_or(LlmError::EmptyResponse);
        }

        chat_req = chat_req.append_message(ChatMessage::from(reply.tool_calls.clone()));

        for call in &reply.tool_calls {
            runtime.observers.emit(RunEvent::ToolCall {
                agent_role: agent.role.clone(),
                call_id: call.call_id.clone(),
                tool: call.fn_name.clone(),
                arguments: call.fn_arguments.clone(),
            });

            let result = tools.dispatch(call).await;

            runtime.observers.emit(RunEvent::ToolResult {
                agent_role: agent.role.clone(),
                call_id: call.call_id.clone(),
                tool: call.fn_name.clone(),
                result: result.clone(),
            });

            chat_req = chat_req.append_message(ToolResponse::new(call.call_id.clone(), result));
        }
    }

    tracing::info!(role = %agent.role, max_iter, "Iteration limit reached, forcing final answer");
    chat_req.tools = None;
    chat_req = chat_req.append_message(ChatMessage::user(FORCE_FINAL_ANSWER));

    let reply = call_model(runtime, agent, &llm, chat_req, max_iter + 1).await?;
    reply.text.ok_or(LlmError::EmptyResponse)
}

async fn call_model(
    runtime: &Runtime,
    agent: &Agent,
    llm: &LlmConfig,
    chat_req: ChatRequest,
    turn: usize,
) -> Result<ChatTurn, LlmError> {
    runtime.observers.emit(RunEvent::LlmRequest {
        agent_role: agent.role.clone(),
        model: llm.model.clone(),
        turn,
    });

    let reply = runtime
        .backend
        .complete(&llm.model, chat_req, llm.temperature)
        .await?;

    let usage = reply.usage.unwrap_or_default();
    runtime.observers.emit(RunEvent::LlmResponse {
        agent_role: agent.role.clone(),
        model: llm.model.clone(),
        turn,
        text: reply.text.clone(),
        tool_calls: reply.tool_calls.len(),
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
    });

    Ok(reply)
}
