//! The declared pipelines. Each module builds a validated [`Crew`] and the
//! kickoff inputs it expects; running it is left to the caller.

pub mod car_diagnosis;
pub mod mcp_trading;
pub mod tech_compare;
pub mod traced_review;
pub mod wiki_summary;

use crate::config::AppConfig;
use crate::crew::{Crew, LlmConfig};

/// Apply the crew-wide settings shared by every pipeline.
fn configure(crew: Crew, config: &AppConfig) -> Crew {
    crew.with_default_llm(LlmConfig::new(&config.model))
        .with_max_iter(config.max_iter)
        .with_verbose(config.verbose)
}

/// Worker model with an explicit temperature.
fn worker_llm(config: &AppConfig, temperature: f64) -> LlmConfig {
    LlmConfig::new(&config.model).with_temperature(temperature)
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    crate::config::PartialConfig::default().finalize()
}
