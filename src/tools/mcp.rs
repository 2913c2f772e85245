//! MCP tool adapter over the streamable-http transport.
//!
//! Connects to an MCP server with `rmcp`, lists its tools, keeps the ones
//! named in [`McpServerParams::tool_names`], and exposes each as an
//! [`AgentTool`]. Transport semantics (sessions, SSE framing, JSON-RPC) stay
//! inside `rmcp`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::{Peer, RunningService};
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Value, json};

use super::AgentTool;
use crate::config::AppConfig;
use crate::error::McpError;

/// Where and how to reach the MCP server.
#[derive(Debug, Clone)]
pub struct McpServerParams {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Tools to expose. Empty means every tool the server lists.
    pub tool_names: Vec<String>,
    pub connect_timeout: Duration,
}

impl McpServerParams {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            url: config.mcp_url.clone(),
            headers: config.mcp_headers.clone(),
            tool_names: config.mcp_tools.clone(),
            connect_timeout: config.mcp_connect_timeout,
        }
    }
}

/// A live MCP session and the tools taken from it.
pub struct McpToolAdapter {
    service: RunningService<RoleClient, ()>,
    tools: Vec<Arc<dyn AgentTool>>,
}

impl McpToolAdapter {
    /// Connect, initialize the session, and collect the requested tools.
    pub async fn connect(params: &McpServerParams) -> Result<Self, McpError> {
        let http = reqwest::Client::builder()
            .default_headers(header_map(&params.headers)?)
            .build()
            .map_err(|e| McpError::Client(e.to_string()))?;

        let transport = StreamableHttpClientTransport::with_client(
            http,
            StreamableHttpClientTransportConfig::with_uri(params.url.clone()),
        );

        let service = tokio::time::timeout(params.connect_timeout, ().serve(transport))
            .await
            .map_err(|_| McpError::ConnectTimeout {
                url: params.url.clone(),
                secs: params.connect_timeout.as_secs(),
            })?
            .map_err(|e| McpError::Connection {
                url: params.url.clone(),
                message: e.to_string(),
            })?;

        let listed = service
            .list_all_tools()
            .await
            .map_err(|e| McpError::Request(format!("tools/list: {e}")))?;

        let (selected, missing) = select_by_name(listed, |t| t.name.as_ref(), &params.tool_names);
        if !missing.is_empty() {
            tracing::warn!(?missing, url = %params.url, "MCP server does not offer requested tools");
        }

        let peer = service.peer().clone();
        let tools = selected
            .into_iter()
            .map(|tool| {
                Arc::new(McpTool {
                    peer: peer.clone(),
                    name: tool.name.to_string(),
                    description: tool
                        .description
                        .as_deref()
                        .unwrap_or_default()
                        .to_string(),
                    schema: Value::Object(tool.input_schema.as_ref().clone()),
                }) as Arc<dyn AgentTool>
            })
            .collect::<Vec<_>>();

        tracing::info!(url = %params.url, tools = tools.len(), "MCP tools attached");
        Ok(Self { service, tools })
    }

    pub fn tools(&self) -> Vec<Arc<dyn AgentTool>> {
        self.tools.clone()
    }

    /// Shut down the MCP session.
    pub async fn close(self) {
        if let Err(e) = self.service.cancel().await {
            tracing::warn!("MCP session did not shut down cleanly: {e}");
        }
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, McpError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| McpError::Client(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| McpError::Client(format!("invalid header value for `{name}`: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Keep items whose name is in `wanted` (all items when `wanted` is empty).
/// Also returns the wanted names that were not found.
fn select_by_name<T>(
    items: Vec<T>,
    name_of: impl Fn(&T) -> &str,
    wanted: &[String],
) -> (Vec<T>, Vec<String>) {
    if wanted.is_empty() {
        return (items, Vec::new());
    }
    let missing = wanted
        .iter()
        .filter(|w| !items.iter().any(|item| name_of(item) == w.as_str()))
        .cloned()
        .collect();
    let selected = items
        .into_iter()
        .filter(|item| wanted.iter().any(|w| w == name_of(item)))
        .collect();
    (selected, missing)
}

/// Flatten a tool result to text for the model.
///
/// Text blocks are joined with newlines; structured content is used when no
/// text is present. Server-side tool errors are wrapped in a JSON error object.
fn render_result(result: CallToolResult) -> String {
    let text = result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n");

    let body = if text.is_empty() {
        result
            .structured_content
            .map(|v| v.to_string())
            .unwrap_or_default()
    } else {
        text
    };

    if result.is_error.unwrap_or(false) {
        json!({ "error": body }).to_string()
    } else {
        body
    }
}

/// One remote tool, callable through the shared MCP session.
pub struct McpTool {
    peer: Peer<RoleClient>,
    name: String,
    description: String,
    schema: Value,
}

#[async_trait]
impl AgentTool for McpTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn args_schema(&self) -> Option<Value> {
        Some(self.schema.clone())
    }

    async fn run(&self, args: Value) -> String {
        let request = CallToolRequestParam {
            name: self.name.clone().into(),
            arguments: args.as_object().cloned(),
        };
        match self.peer.call_tool(request).await {
            Ok(result) => render_result(result),
            Err(e) => json!({ "error": format!("{}: {e}", self.name) }).to_string(),
        }
    }
}
