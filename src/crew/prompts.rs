//! Prompt text for agents, tasks and the generated manager.

use super::types::Agent;
use crate::tools::ToolBox;

pub const MANAGER_ROLE: &str = "Crew Manager";
pub const MANAGER_GOAL: &str = "Manage the team to complete the task in the best way possible.";
pub const MANAGER_BACKSTORY: &str = "You are a seasoned manager with a knack for getting the best \
     out of your team. You are also known for your ability to delegate work to the right people, \
     and to ask the right questions to get the best out of your team. Even though you don't \
     perform tasks by yourself, you have a lot of experience in the field, which allows you to \
     properly evaluate the work of your team members.";

pub const COWORKER_EXPECTED_OUTPUT: &str =
    "Your best answer to your coworker asking you this, accounting for the context shared.";

pub const FORCE_FINAL_ANSWER: &str = "You have used the maximum number of tool iterations. \
     Do not call any more tools. Give your best complete final answer now.";

/// System prompt built from the agent's persona and its tools.
pub fn agent_system_prompt(agent: &Agent, tools: &ToolBox) -> String {
    let mut prompt = format!(
        "You are {}. {}\nYour personal goal is: {}\n",
        agent.role, agent.backstory, agent.goal
    );

    if tools.is_empty() {
        prompt.push_str("\nYou have no tools; answer from your own knowledge.\n");
    } else {
        prompt.push_str("\n## Available Tools\n\n");
        prompt.push_str(&tools.descriptions());
        prompt.push_str(
            "\n\nCall a tool when it helps. Tool results are ground truth; never fabricate them.\n",
        );
    }

    prompt.push_str(
        "\nWhen you have the final answer, reply with it directly and do not call any tool.",
    );
    prompt
}

/// User message describing the task to perform.
pub fn task_prompt(
    description: &str,
    expected_output: &str,
    context: Option<&str>,
    markdown: bool,
) -> String {
    let mut prompt = format!(
        "Current Task: {description}\n\n\
         This is the expected criteria for your final answer: {expected_output}\n\
         You MUST return the actual complete content as the final answer, not a summary."
    );

    if markdown {
        prompt.push_str("\n\nFormat your final answer in Markdown.");
    }

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(context);
    }

    prompt
}

/// Join earlier task outputs into one context block.
pub fn join_context<'a>(outputs: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let joined = outputs.into_iter().collect::<Vec<_>>().join("\n\n----------\n\n");
    (!joined.is_empty()).then_some(joined)
}
