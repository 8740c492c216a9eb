use super::react::AgentStep;
use crate::tool::ToolBox;

const PREFIX: &str =
    "Answer the following questions as best you can. You have access to the following tools:";

const SUFFIX: &str = "Begin!\n\nQuestion: {input}\nThought:{agent_scratchpad}";

pub const OBSERVATION_PREFIX: &str = "Observation: ";
pub const LLM_PREFIX: &str = "Thought:";

/// Stop sequence that keeps the model from inventing tool results.
pub const STOP_SEQUENCE: &str = "\nObservation:";

fn format_instructions(tool_names: &str) -> String {
    format!(
        "Use the following format:\n\n\
         Question: the input question you must answer\n\
         Thought: you should always think about what to do\n\
         Action: the action to take, should be one of [{tool_names}]\n\
         Action Input: the input to the action\n\
         Observation: the result of the action\n\
         ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
         Thought: I now know the final answer\n\
         Final Answer: the final answer to the original input question"
    )
}

/// Prompt template with `{input}` and `{agent_scratchpad}` left open.
pub fn build_template(tools: &ToolBox) -> String {
    format!(
        "{PREFIX}\n\n{}\n\n{}\n\n{SUFFIX}",
        tools.describe(),
        format_instructions(&tools.names().join(", "))
    )
}

/// Thought/Action/Observation history fed back to the model.
pub fn scratchpad(steps: &[AgentStep]) -> String {
    steps
        .iter()
        .map(|step| {
            format!(
                "{}\n{OBSERVATION_PREFIX}{}\n{LLM_PREFIX}",
                step.action.log, step.observation
            )
        })
        .collect()
}

pub fn render(template: &str, input: &str, steps: &[AgentStep]) -> String {
    template
        .replace("{agent_scratchpad}", &scratchpad(steps))
        .replace("{input}", input)
}
