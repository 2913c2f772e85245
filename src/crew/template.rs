//! `{name}` placeholder handling for task descriptions.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PipelineError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"));

/// Placeholder names in order of first appearance, without duplicates.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(text) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute every placeholder from `vars`.
///
/// Braces that do not wrap an identifier (JSON examples, `{ }`) are left as-is.
pub fn interpolate(text: &str, vars: &HashMap<String, String>) -> Result<String, PipelineError> {
    if let Some(name) = placeholders(text).into_iter().find(|n| !vars.contains_key(n)) {
        return Err(PipelineError::MissingInput { name });
    }
    Ok(PLACEHOLDER
        .replace_all(text, |cap: &regex::Captures<'_>| vars[&cap[1]].clone())
        .into_owned())
}
