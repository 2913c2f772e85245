//! Hierarchical car diagnosis: a manager routes the report to a diagnosis
//! agent and to oil and tire specialists.

use super::{configure, worker_llm};
use crate::config::AppConfig;
use crate::crew::{Agent, Crew, LlmConfig, Process, Task};
use crate::error::PipelineError;

pub const DEFAULT_REPORT: &str = "My car makes a strange noise when driving, feels bumpy.";
pub const DEFAULT_MANAGER_MODEL: &str = "gpt-4o";

/// The report is embedded verbatim in the first task, so the crew takes no inputs.
pub fn crew(config: &AppConfig, report: &str) -> Result<Crew, PipelineError> {
    let llm = worker_llm(config, 0.0);
    let manager_llm = LlmConfig::new(config.manager_model.as_deref().unwrap_or(DEFAULT_MANAGER_MODEL))
        .with_temperature(0.0);

    let diagnosis_agent = Agent::new(
        "Car Diagnosis Agent",
        "Diagnose car problems based on user symptoms",
        "Expert at figuring out car issues from brief descriptions",
    )
    .with_llm(llm.clone())
    .with_verbose(true);

    let oil_specialist = Agent::new(
        "Oil Specialist",
        "Give advice on oil-related car issues",
        "Knows everything about oil changes and lubrication systems",
    )
    .with_llm(llm.clone())
    .with_verbose(true);

    let tire_specialist = Agent::new(
        "Tire Specialist",
        "Give advice on tire-related issues",
        "Expert in tire maintenance and repairs",
    )
    .with_llm(llm)
    .with_verbose(true);

    let diagnosis_task = Task::new(
        format!("User reports: '{report}'. Diagnose the car issue based on this report."),
        "A brief diagnosis identifying the likely issue type (oil, tire, suspension, brakes, or engine).",
        &diagnosis_agent,
    )
    .with_literal(true);
    let oil_task = Task::new(
        "Based on the diagnosis, provide oil change and lubrication system maintenance advice if relevant.",
        "Oil-related maintenance tips or required service steps if applicable, otherwise state 'Not applicable'.",
        &oil_specialist,
    );
    let tire_task = Task::new(
        "Based on the diagnosis, provide tire maintenance and repair advice if relevant.",
        "Tire-related maintenance tips or required service steps if applicable, otherwise state 'Not applicable'.",
        &tire_specialist,
    );

    let crew = Crew::new(
        vec![diagnosis_agent, oil_specialist, tire_specialist],
        vec![diagnosis_task, oil_task, tire_task],
        Process::Hierarchical,
        Some(manager_llm),
    )?;
    Ok(configure(crew, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::test_config;

    #[test]
    fn hierarchical_with_three_specialists() {
        let crew = crew(&test_config(), DEFAULT_REPORT).unwrap();
        assert_eq!(crew.process(), Process::Hierarchical);
        let roles: Vec<&str> = crew.agents().iter().map(|a| a.role.as_str()).collect();
        assert_eq!(roles, vec!["Car Diagnosis Agent", "Oil Specialist", "Tire Specialist"]);
        assert!(crew.tasks()[0].description.contains("feels bumpy"));
        assert!(crew.agents().iter().all(|a| a.llm.as_ref().unwrap().model == "gpt-4o-mini"));
    }

    #[test]
    fn manager_defaults_to_gpt_4o() {
        let crew = crew(&test_config(), DEFAULT_REPORT).unwrap();
        let manager = crew.manager_llm().unwrap();
        assert_eq!(manager.model, DEFAULT_MANAGER_MODEL);
        assert_eq!(manager.temperature, Some(0.0));

        let mut config = test_config();
        config.manager_model = Some("gpt-4.1".to_string());
        let crew = super::crew(&config, DEFAULT_REPORT).unwrap();
        assert_eq!(crew.manager_llm().unwrap().model, "gpt-4.1");
    }

    #[test]
    fn report_braces_reach_the_task_unchanged() {
        let report = "Dash shows {P0301} after a cold start";
        let crew = crew(&test_config(), report).unwrap();
        assert_eq!(
            crew.tasks()[0].description,
            "User reports: 'Dash shows {P0301} after a cold start'. Diagnose the car issue based on this report."
        );
    }
}
