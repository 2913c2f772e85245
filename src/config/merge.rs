use super::schema::{AppConfig, PartialConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MCP_URL: &str = "http://127.0.0.1:9000/mcp";
pub const DEFAULT_WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// Tools exposed from the trading MCP server unless the config says otherwise.
pub fn default_mcp_tools() -> Vec<String> {
    ["get_portfolio", "list_coinbase_products", "execute_crypto_trade", "tool_health"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_mcp_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("X-User-Id".to_string(), "sample-user-123".to_string()),
        ("X-Scopes".to_string(), "portfolio:read,portfolio:trade".to_string()),
    ])
}

impl PartialConfig {
    /// Merge self with a lower-priority fallback.
    /// Self's non-None values take precedence.
    /// For mcp_tools and mcp_headers: REPLACE semantics (if self has Some, use it entirely).
    pub fn with_fallback(self, fallback: PartialConfig) -> PartialConfig {
        PartialConfig {
            model: self.model.or(fallback.model),
            manager_model: self.manager_model.or(fallback.manager_model),
            max_iter: self.max_iter.or(fallback.max_iter),
            mcp_url: self.mcp_url.or(fallback.mcp_url),
            mcp_connect_timeout_secs: self
                .mcp_connect_timeout_secs
                .or(fallback.mcp_connect_timeout_secs),
            mcp_tools: self.mcp_tools.or(fallback.mcp_tools),
            mcp_headers: self.mcp_headers.or(fallback.mcp_headers),
            wikipedia_endpoint: self.wikipedia_endpoint.or(fallback.wikipedia_endpoint),
            wikipedia_timeout_secs: self
                .wikipedia_timeout_secs
                .or(fallback.wikipedia_timeout_secs),
            langfuse_host: self.langfuse_host.or(fallback.langfuse_host),
            langfuse_user_id: self.langfuse_user_id.or(fallback.langfuse_user_id),
            langfuse_session_id: self.langfuse_session_id.or(fallback.langfuse_session_id),
            langfuse_release: self.langfuse_release.or(fallback.langfuse_release),
            run_log: self.run_log.or(fallback.run_log),
            run_log_dir: self.run_log_dir.or(fallback.run_log_dir),
            verbose: self.verbose.or(fallback.verbose),
        }
    }

    /// Convert to AppConfig, filling any remaining gaps with defaults.
    pub fn finalize(self) -> AppConfig {
        AppConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            manager_model: self.manager_model,
            max_iter: self.max_iter.unwrap_or(25),
            mcp_url: self.mcp_url.unwrap_or_else(|| DEFAULT_MCP_URL.to_string()),
            mcp_connect_timeout: Duration::from_secs(self.mcp_connect_timeout_secs.unwrap_or(60)),
            mcp_tools: self.mcp_tools.unwrap_or_else(default_mcp_tools),
            mcp_headers: self.mcp_headers.unwrap_or_else(default_mcp_headers),
            wikipedia_endpoint: self
                .wikipedia_endpoint
                .unwrap_or_else(|| DEFAULT_WIKIPEDIA_ENDPOINT.to_string()),
            wikipedia_timeout: Duration::from_secs(self.wikipedia_timeout_secs.unwrap_or(10)),
            langfuse_host: self.langfuse_host,
            langfuse_user_id: self.langfuse_user_id.unwrap_or_else(|| "user_123".to_string()),
            langfuse_session_id: self
                .langfuse_session_id
                .unwrap_or_else(|| "sess_abc".to_string()),
            langfuse_release: self.langfuse_release.unwrap_or_else(|| "v0.1.0".to_string()),
            run_log: self.run_log.unwrap_or(true),
            run_log_dir: self
                .run_log_dir
                .unwrap_or_else(|| PathBuf::from(".crewrun-logs")),
            verbose: self.verbose.unwrap_or(false),
        }
    }
}
