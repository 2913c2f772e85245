//! Wikipedia summary lookup.
//!
//! [`WikiSummaryTool`] issues a single GET against the Wikipedia REST summary
//! endpoint. There is no retry and no cache; every failure is folded into a
//! human-readable string for the model.
//!
//! [`CannedSummaryTool`] answers from a fixed keyword table without touching
//! the network. It registers under the same tool name so prompts that say
//! "prefer wiki_summary" work unchanged.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AgentTool, string_arg};

pub const TOOL_NAME: &str = "wiki_summary";

#[derive(Debug, Deserialize)]
struct SummaryBody {
    extract: Option<String>,
    description: Option<String>,
}

pub struct WikiSummaryTool {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl WikiSummaryTool {
    /// `endpoint` is the summary base URL, e.g.
    /// `https://en.wikipedia.org/api/rest_v1/page/summary`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crewrun/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Fetch a summary for `topic`. Never fails: errors become the returned text.
    pub async fn summarize(&self, topic: &str) -> String {
        match self.fetch(topic).await {
            Ok(text) => text,
            Err(e) => format!("Error fetching summary: {e}"),
        }
    }

    async fn fetch(&self, topic: &str) -> Result<String, reqwest::Error> {
        let url = summary_url(&self.endpoint, topic);
        tracing::debug!(%url, "wiki_summary request");

        let resp = self.http.get(&url).timeout(self.timeout).send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Ok(format!("Couldn't fetch summary (status {}).", status.as_u16()));
        }

        let body: SummaryBody = resp.json().await?;
        Ok(pick_summary(body))
    }
}

/// Build the request URL: trimmed topic, spaces to underscores, then
/// percent-encoded as a single path segment.
fn summary_url(endpoint: &str, topic: &str) -> String {
    let title = topic.trim().replace(' ', "_");
    format!("{}/{}", endpoint.trim_end_matches('/'), urlencoding::encode(&title))
}

fn pick_summary(body: SummaryBody) -> String {
    [body.extract, body.description]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "No summary found.".to_string())
}

fn topic_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "topic": {
                "type": "string",
                "description": "Topic or article title to summarize"
            }
        },
        "required": ["topic"]
    })
}

#[async_trait]
impl AgentTool for WikiSummaryTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Fetch a concise summary for a topic from Wikipedia."
    }

    fn args_schema(&self) -> Option<Value> {
        Some(topic_schema())
    }

    async fn run(&self, args: Value) -> String {
        match string_arg(&args, "topic") {
            Some(topic) => self.summarize(topic).await,
            None => "Error fetching summary: missing 'topic' argument".to_string(),
        }
    }
}

/// Offline summary tool backed by a keyword table.
pub struct CannedSummaryTool {
    entries: Vec<(String, String)>,
}

impl CannedSummaryTool {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// The web-framework table used by the technology comparison crew.
    pub fn web_frameworks() -> Self {
        Self::new(vec![
            (
                "fastapi".to_string(),
                "FastAPI is a modern, fast (high-performance), web framework for building APIs with Python 3.7+."
                    .to_string(),
            ),
            (
                "flask".to_string(),
                "Flask is a micro web framework written in Python. It is classified as a microframework because it does not require particular tools or libraries."
                    .to_string(),
            ),
        ])
    }

    /// First entry whose keyword appears in the topic, case-insensitively.
    pub fn lookup(&self, topic: &str) -> String {
        let topic = topic.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| topic.contains(keyword.as_str()))
            .map(|(_, summary)| summary.clone())
            .unwrap_or_else(|| "No summary available for this topic.".to_string())
    }
}

#[async_trait]
impl AgentTool for CannedSummaryTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Return a concise summary for a topic from Wikipedia."
    }

    fn args_schema(&self) -> Option<Value> {
        Some(topic_schema())
    }

    async fn run(&self, args: Value) -> String {
        self.lookup(string_arg(&args, "topic").unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_for(server: &mockito::ServerGuard) -> WikiSummaryTool {
        WikiSummaryTool::new(
            format!("{}/api/rest_v1/page/summary", server.url()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn url_replaces_spaces_and_encodes() {
        assert_eq!(
            summary_url("https://w.org/summary/", "  Moon landing "),
            "https://w.org/summary/Moon_landing"
        );
        assert_eq!(summary_url("https://w.org/s", "C++/CLI"), "https://w.org/s/C%2B%2B%2FCLI");
        assert_eq!(summary_url("https://w.org/s", "Apollo 11 (mission)"), "https://w.org/s/Apollo_11_%28mission%29");
        assert_eq!(summary_url("https://w.org/s", "Zürich"), "https://w.org/s/Z%C3%BCrich");
    }

    #[tokio::test]
    async fn returns_extract_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/rest_v1/page/summary/Moon_landing")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"extract": "A Moon landing is the arrival of a spacecraft.", "description": "arrival"}"#)
            .create_async()
            .await;

        let result = tool_for(&server).summarize("Moon landing").await;
        assert_eq!(result, "A Moon landing is the arrival of a spacecraft.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn falls_back_to_description_then_default() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/rest_v1/page/summary/Rust")
            .with_status(200)
            .with_body(r#"{"description": "Programming language"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/rest_v1/page/summary/Nothing")
            .with_status(200)
            .with_body(r#"{"title": "Nothing"}"#)
            .create_async()
            .await;

        let tool = tool_for(&server);
        assert_eq!(tool.summarize("Rust").await, "Programming language");
        assert_eq!(tool.summarize("Nothing").await, "No summary found.");
    }

    #[tokio::test]
    async fn non_200_returns_fixed_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/rest_v1/page/summary/Missing_page")
            .with_status(404)
            .with_body(r#"{"type": "not_found"}"#)
            .create_async()
            .await;

        let result = tool_for(&server).summarize("Missing page").await;
        assert_eq!(result, "Couldn't fetch summary (status 404).");
    }

    #[tokio::test]
    async fn malformed_body_is_reported_not_raised() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/rest_v1/page/summary/Broken")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = tool_for(&server).summarize("Broken").await;
        assert!(result.starts_with("Error fetching summary:"), "got: {result}");
    }

    #[tokio::test]
    async fn unreachable_host_is_reported_not_raised() {
        let tool = WikiSummaryTool::new("http://127.0.0.1:1/summary", Duration::from_secs(2));
        let result = tool.run(json!({"topic": "Anything"})).await;
        assert!(result.starts_with("Error fetching summary:"), "got: {result}");
    }

    #[tokio::test]
    async fn canned_tool_matches_keywords() {
        let tool = CannedSummaryTool::web_frameworks();
        assert!(tool.run(json!({"topic": "FastAPI basics"})).await.starts_with("FastAPI is"));
        assert!(tool.run(json!({"topic": "flask"})).await.starts_with("Flask is"));
        assert_eq!(
            tool.run(json!({"topic": "Django"})).await,
            "No summary available for this topic."
        );
    }
}
