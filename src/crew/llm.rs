//! LLM backend seam for the executor.
//!
//! [`GenaiBackend`] talks to the provider through `genai`, consuming the chat
//! stream and keeping only the captured end state: first text, tool calls and
//! token usage. Tests substitute a scripted [`ChatBackend`].

use async_trait::async_trait;
use futures::StreamExt;
use genai::Client;
use genai::chat::{ChatOptions, ChatRequest, ChatStreamEvent, ToolCall};

use crate::error::LlmError;

/// Token counts reported by the provider for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// What the model produced in one call.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

impl ChatTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        request: ChatRequest,
        temperature: Option<f64>,
    ) -> Result<ChatTurn, LlmError>;
}

/// Provider-backed implementation; the model name selects the provider
/// (e.g. `gpt-4o-mini` goes to OpenAI and reads `OPENAI_API_KEY`).
#[derive(Default)]
pub struct GenaiBackend {
    client: Client,
}

#[async_trait]
impl ChatBackend for GenaiBackend {
    async fn complete(
        &self,
        model: &str,
        request: ChatRequest,
        temperature: Option<f64>,
    ) -> Result<ChatTurn, LlmError> {
        let mut options = ChatOptions::default()
            .with_capture_content(true)
            .with_capture_tool_calls(true)
            .with_capture_usage(true);
        if let Some(t) = temperature {
            options = options.with_temperature(t);
        }

        let stream_res = self
            .client
            .exec_chat_stream(model, request, Some(&options))
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let mut stream = stream_res.stream;
        let mut last_error: Option<String> = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::End(end)) => {
                    let text = end.captured_first_text().map(|t| t.to_string());
                    let tool_calls: Vec<ToolCall> = end
                        .captured_tool_calls()
                        .map(|calls| calls.into_iter().cloned().collect())
                        .unwrap_or_default();
                    let usage = end.captured_usage.as_ref().map(|u| TokenUsage {
                        prompt_tokens: token_count(u.prompt_tokens),
                        completion_tokens: token_count(u.completion_tokens),
                    });

                    if text.is_none() && tool_calls.is_empty() {
                        return Err(LlmError::EmptyResponse);
                    }
                    return Ok(ChatTurn {
                        text,
                        tool_calls,
                        usage,
                    });
                }
                Ok(_) => {
                    // Chunks are re-read from the captured end state.
                }
                Err(e) => {
                    tracing::warn!("LLM stream error: {e}");
                    // Continue -- the End event may still arrive.
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(LlmError::Stream(
            last_error.unwrap_or_else(|| "stream ended without a final event".to_string()),
        ))
    }
}

/// Providers report counts as `i32`; absent or negative counts are zero.
fn token_count(count: Option<i32>) -> u64 {
    count.and_then(|c| u64::try_from(c).ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_counts_never_wrap() {
        assert_eq!(token_count(Some(1234)), 1234);
        assert_eq!(token_count(None), 0);
        assert_eq!(token_count(Some(-1)), 0);
    }
}
