//! JSONL run logger for full run replay.
//!
//! Writes every [`RunEvent`] as one timestamped JSON line to
//! `{log_dir}/run-{ISO8601}-{short id}.jsonl`.
//!
//! Uses synchronous `std::fs` since writes are small, buffered, and flushed
//! after each event.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

use super::{RunEvent, RunObserver};

/// Returns the current UTC time as an ISO 8601 string with milliseconds.
pub(crate) fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    event: &'a RunEvent,
}

/// Append-only JSONL logger for one crew run.
pub struct RunLogger {
    writer: Mutex<BufWriter<fs::File>>,
    log_path: PathBuf,
}

impl RunLogger {
    /// Create the log directory if needed and open a fresh run file.
    pub fn new(log_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(log_dir)?;

        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let short_id = uuid::Uuid::new_v4().simple().to_string();
        let filename = format!("run-{stamp}-{}.jsonl", &short_id[..8]);
        let log_path = log_dir.join(filename);

        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            log_path,
        })
    }

    /// Serialize an event as a single JSON line and flush.
    pub fn log_event(&self, event: &RunEvent) -> anyhow::Result<()> {
        let line = LogLine {
            timestamp: now_iso(),
            event,
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("run log writer poisoned"))?;
        serde_json::to_writer(&mut *writer, &line)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Return the path to the current run log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl RunObserver for RunLogger {
    fn on_event(&self, event: &RunEvent) {
        if let Err(e) = self.log_event(event) {
            tracing::warn!(path = %self.log_path.display(), "Failed to write run log: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::Process;
    use std::io::BufRead;
    use tempfile::TempDir;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        let file = fs::File::open(path).expect("open log");
        std::io::BufReader::new(file)
            .lines()
            .map(|l| serde_json::from_str(&l.expect("read line")).expect("valid JSON"))
            .collect()
    }

    #[test]
    fn creates_run_file_in_log_dir() {
        let tmp = TempDir::new().unwrap();
        let log_dir = tmp.path().join("logs");
        let logger = RunLogger::new(&log_dir).expect("RunLogger::new");

        assert!(logger.log_path().exists());
        assert!(logger.log_path().starts_with(&log_dir));
        let name = logger.log_path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("run-"));
        assert!(name.ends_with(".jsonl"));
    }

    #[test]
    fn each_event_is_one_timestamped_line() {
        let tmp = TempDir::new().unwrap();
        let logger = RunLogger::new(tmp.path()).unwrap();

        logger.on_event(&RunEvent::RunStarted {
            run_id: "r1".to_string(),
            process: Process::Sequential,
            agents: 2,
            tasks: 2,
        });
        logger.on_event(&RunEvent::ToolResult {
            agent_role: "Research Agent".to_string(),
            call_id: "call_001".to_string(),
            tool: "wiki_summary".to_string(),
            result: "The Moon landing...".to_string(),
        });
        logger.on_event(&RunEvent::RunCompleted {
            output: "Final".to_string(),
        });

        let lines = read_lines(logger.log_path());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event_type"], "run_started");
        assert_eq!(lines[0]["process"], "sequential");
        assert_eq!(lines[1]["event_type"], "tool_result");
        assert_eq!(lines[1]["tool"], "wiki_summary");
        assert_eq!(lines[2]["output"], "Final");
        assert!(lines.iter().all(|l| l["timestamp"].is_string()));
    }

    #[test]
    fn llm_response_without_text_omits_field() {
        let tmp = TempDir::new().unwrap();
        let logger = RunLogger::new(tmp.path()).unwrap();

        logger.on_event(&RunEvent::LlmResponse {
            agent_role: "Writer".to_string(),
            model: "gpt-4o-mini".to_string(),
            turn: 1,
            text: None,
            tool_calls: 2,
            prompt_tokens: 100,
            completion_tokens: 20,
        });

        let lines = read_lines(logger.log_path());
        assert!(lines[0].get("text").is_none());
        assert_eq!(lines[0]["tool_calls"], 2);
    }
}
