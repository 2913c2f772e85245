use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// The TOML file structure for crewrun.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub llm: Option<LlmSection>,
    pub mcp: Option<McpSection>,
    pub wikipedia: Option<WikipediaSection>,
    pub langfuse: Option<LangfuseSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Deserialize)]
pub struct LlmSection {
    pub model: Option<String>,
    pub manager_model: Option<String>,
    pub max_iter: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct McpSection {
    pub url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    /// If specified, fully replaces the default tool allow-list.
    pub tools: Option<Vec<String>>,
    /// If specified, fully replaces the default request headers.
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct WikipediaSection {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LangfuseSection {
    pub host: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub release: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub run_log: Option<bool>,
    pub run_log_dir: Option<String>,
}

/// Fully-resolved runtime configuration. All fields have values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    /// `None` lets each hierarchical pipeline use its own manager default.
    pub manager_model: Option<String>,
    pub max_iter: usize,
    pub mcp_url: String,
    pub mcp_connect_timeout: Duration,
    pub mcp_tools: Vec<String>,
    pub mcp_headers: BTreeMap<String, String>,
    pub wikipedia_endpoint: String,
    pub wikipedia_timeout: Duration,
    /// `None` means "take LANGFUSE_HOST or the cloud default".
    pub langfuse_host: Option<String>,
    pub langfuse_user_id: String,
    pub langfuse_session_id: String,
    pub langfuse_release: String,
    pub run_log: bool,
    pub run_log_dir: PathBuf,
    pub verbose: bool,
}

/// Partial config used during merge. All fields are Option so that
/// missing fields don't override lower-priority values.
#[derive(Debug, Clone, Default)]
pub struct PartialConfig {
    pub model: Option<String>,
    pub manager_model: Option<String>,
    pub max_iter: Option<usize>,
    pub mcp_url: Option<String>,
    pub mcp_connect_timeout_secs: Option<u64>,
    pub mcp_tools: Option<Vec<String>>,
    pub mcp_headers: Option<BTreeMap<String, String>>,
    pub wikipedia_endpoint: Option<String>,
    pub wikipedia_timeout_secs: Option<u64>,
    pub langfuse_host: Option<String>,
    pub langfuse_user_id: Option<String>,
    pub langfuse_session_id: Option<String>,
    pub langfuse_release: Option<String>,
    pub run_log: Option<bool>,
    pub run_log_dir: Option<PathBuf>,
    pub verbose: Option<bool>,
}

impl ConfigFile {
    /// Flatten the sectioned file layout into a [`PartialConfig`].
    pub fn to_partial(self) -> PartialConfig {
        let mut partial = PartialConfig::default();
        if let Some(llm) = self.llm {
            partial.model = llm.model;
            partial.manager_model = llm.manager_model;
            partial.max_iter = llm.max_iter;
        }
        if let Some(mcp) = self.mcp {
            partial.mcp_url = mcp.url;
            partial.mcp_connect_timeout_secs = mcp.connect_timeout_secs;
            partial.mcp_tools = mcp.tools;
            partial.mcp_headers = mcp.headers;
        }
        if let Some(wiki) = self.wikipedia {
            partial.wikipedia_endpoint = wiki.endpoint;
            partial.wikipedia_timeout_secs = wiki.timeout_secs;
        }
        if let Some(lf) = self.langfuse {
            partial.langfuse_host = lf.host;
            partial.langfuse_user_id = lf.user_id;
            partial.langfuse_session_id = lf.session_id;
            partial.langfuse_release = lf.release;
        }
        if let Some(logging) = self.logging {
            partial.run_log = logging.run_log;
            partial.run_log_dir = logging.run_log_dir.map(PathBuf::from);
        }
        partial
    }
}
