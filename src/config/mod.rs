pub mod merge;
pub mod schema;

pub use schema::*;

use crate::cli::Cli;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Load configuration by merging global, local, and CLI sources.
/// Precedence: CLI > `--config` file (or ./crewrun.toml) > global config > defaults.
///
/// Missing config files are handled gracefully (defaults apply).
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    // Layer 1: Global config (~/.config/crewrun/crewrun.toml or platform equivalent)
    let global = load_global_config();

    // Layer 2: Explicit --config path, else crewrun.toml in the working directory.
    let local = match &cli.config {
        Some(path) => {
            // An explicitly named file must exist and parse.
            load_toml_file(path)?.ok_or_else(|| ConfigError::ParseError {
                path: path.clone(),
                message: "file not found".to_string(),
            })?
        }
        None => load_toml_file(Path::new("crewrun.toml")).unwrap_or_else(|e| {
            tracing::warn!("Config parse error: {e}");
            None
        })
        .unwrap_or_default(),
    };

    // Layer 3: CLI args (converted to PartialConfig)
    let cli_partial = cli_to_partial(cli);

    let config = cli_partial
        .with_fallback(local)
        .with_fallback(global)
        .finalize();

    Ok(config)
}

/// Load global config from the platform-specific config directory.
/// Returns empty PartialConfig if file not found or unparseable.
fn load_global_config() -> PartialConfig {
    match global_config_path() {
        Some(p) => match load_toml_file(&p) {
            Ok(partial) => partial.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Config parse error: {e}");
                PartialConfig::default()
            }
        },
        None => {
            tracing::debug!("Could not determine global config directory");
            PartialConfig::default()
        }
    }
}

/// Load and parse a TOML config file into a PartialConfig.
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_file(path: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let config_file = parse_config(&contents).map_err(|message| ConfigError::ParseError {
                path: path.to_path_buf(),
                message,
            })?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(Some(config_file.to_partial()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(None)
        }
        Err(e) => Err(ConfigError::IoError(e)),
    }
}

fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    toml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

/// Resolve the platform-specific global config path.
/// Linux: ~/.config/crewrun/crewrun.toml
/// macOS: ~/Library/Application Support/crewrun/crewrun.toml
fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "crewrun")
        .map(|dirs| dirs.config_dir().join("crewrun.toml"))
}

/// Convert CLI arguments to a PartialConfig for merging.
fn cli_to_partial(cli: &Cli) -> PartialConfig {
    PartialConfig {
        model: cli.model.clone(),
        verbose: cli.verbose.then_some(true),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_sectioned_file() {
        let contents = r#"
[llm]
model = "gpt-4o"
max_iter = 5

[mcp]
url = "http://localhost:9100/mcp"
tools = ["get_portfolio"]

[mcp.headers]
X-User-Id = "alice"

[logging]
run_log = false
"#;
        let partial = parse_config(contents).unwrap().to_partial();
        assert_eq!(partial.model.as_deref(), Some("gpt-4o"));
        assert_eq!(partial.max_iter, Some(5));
        assert_eq!(partial.mcp_url.as_deref(), Some("http://localhost:9100/mcp"));
        assert_eq!(partial.mcp_tools, Some(vec!["get_portfolio".to_string()]));
        assert_eq!(partial.mcp_headers.unwrap()["X-User-Id"], "alice");
        assert_eq!(partial.run_log, Some(false));
    }

    #[test]
    fn missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = load_toml_file(&tmp.path().join("nope.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crewrun.toml");
        std::fs::write(&path, "[llm\nmodel = ").unwrap();

        match load_toml_file(&path) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn explicit_config_overrides_defaults_and_cli_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gpt-4o\"\nmanager_model = \"gpt-4o\"\n").unwrap();

        let cli = Cli {
            config: Some(path),
            model: Some("gpt-4o-mini".to_string()),
            verbose: false,
            command: crate::cli::Commands::McpTools,
        };
        let config = load_config(&cli).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.manager_model.as_deref(), Some("gpt-4o"));
    }
}
