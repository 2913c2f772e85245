use std::path::PathBuf;

/// Errors related to configuration loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config at {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Errors raised while validating or running a crew.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{entity} field `{field}` must not be empty")]
    EmptyField { entity: &'static str, field: &'static str },

    #[error("Crew needs at least one {0}")]
    Empty(&'static str),

    #[error("Duplicate agent role: {0}")]
    DuplicateRole(String),

    #[error("Duplicate task output key: {0}")]
    DuplicateOutputKey(String),

    #[error("Task `{task}` is assigned to unknown agent `{role}`")]
    UnknownAgent { task: String, role: String },

    #[error("Hierarchical process requires a manager LLM")]
    MissingManager,

    #[error("Template variable `{{{name}}}` has no value (not an input or earlier output key)")]
    MissingInput { name: String },

    #[error("Agent `{role}` failed: {source}")]
    Agent {
        role: String,
        #[source]
        source: LlmError,
    },
}

/// Errors from the LLM backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM stream error: {0}")]
    Stream(String),

    #[error("Model returned neither text nor tool calls")]
    EmptyResponse,
}

/// Errors from the MCP tool adapter.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Failed to build HTTP client for MCP: {0}")]
    Client(String),

    #[error("Timed out after {secs}s connecting to MCP server at {url}")]
    ConnectTimeout { url: String, secs: u64 },

    #[error("MCP connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("MCP request failed: {0}")]
    Request(String),
}

/// Errors from the Langfuse tracing wrapper.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Langfuse auth failed. Check LANGFUSE_* env and host ({host}).")]
    AuthFailed { host: String },

    #[error("Langfuse request failed: {0}")]
    Http(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
