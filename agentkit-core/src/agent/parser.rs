use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION: &str = "\nObservation";

/// A tool call proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// Raw model text that produced the action
    pub log: String,
}

/// What the model decided on a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    Action(AgentAction),
    Finish { output: String, log: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputParseError {
    #[error("Parsing LLM output produced both a final answer and a parse-able action: {0}")]
    AnswerAndAction(String),

    #[error("Invalid Format: Missing 'Action:' after 'Thought:'")]
    MissingAction,

    #[error("Invalid Format: Missing 'Action Input:' after 'Action:'")]
    MissingActionInput,

    #[error("Could not parse LLM output: `{0}`")]
    Unparseable(String),
}

/// Fed back to the model for parse failures it cannot act on.
pub const INCOMPLETE_RESPONSE: &str = "Invalid or incomplete response";

impl OutputParseError {
    /// Text recorded as the observation when parse errors are handled.
    /// Only the missing-marker errors carry advice worth sending back.
    pub fn observation(&self) -> String {
        match self {
            Self::MissingAction | Self::MissingActionInput => self.to_string(),
            Self::AnswerAndAction(_) | Self::Unparseable(_) => INCOMPLETE_RESPONSE.to_string(),
        }
    }
}

/// Parse Thought / Action / Action Input / Final Answer text.
pub fn parse_output(text: &str) -> Result<AgentDecision, OutputParseError> {
    let includes_answer = text.contains(FINAL_ANSWER);

    if let Some((tool, tool_input)) = find_action(text) {
        if includes_answer {
            return Err(OutputParseError::AnswerAndAction(text.to_string()));
        }
        return Ok(AgentDecision::Action(AgentAction {
            tool,
            tool_input,
            log: text.to_string(),
        }));
    }

    if includes_answer {
        let output = text
            .rsplit(FINAL_ANSWER)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        return Ok(AgentDecision::Finish {
            output,
            log: text.to_string(),
        });
    }

    match text.find(ACTION) {
        None => Err(OutputParseError::MissingAction),
        Some(at) if !text[at..].contains(ACTION_INPUT) => Err(OutputParseError::MissingActionInput),
        Some(_) => Err(OutputParseError::Unparseable(text.to_string())),
    }
}

fn find_action(text: &str) -> Option<(String, String)> {
    let action_at = text.find(ACTION)?;
    let after_action = &text[action_at + ACTION.len()..];
    let input_at = after_action.find(ACTION_INPUT)?;

    let tool = after_action[..input_at].trim();
    if tool.is_empty() {
        return None;
    }

    let mut input = &after_action[input_at + ACTION_INPUT.len()..];
    if let Some(cut) = input.find(OBSERVATION) {
        input = &input[..cut];
    }
    let input = input.trim();
    let input = input
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(input);

    Some((tool.to_string(), input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        let text = "Thought: I should search\nAction: recipe_search\nAction Input: \"chicken curry\"";
        match parse_output(text).unwrap() {
            AgentDecision::Action(action) => {
                assert_eq!(action.tool, "recipe_search");
                assert_eq!(action.tool_input, "chicken curry");
                assert_eq!(action.log, text);
            }
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_action_drops_hallucinated_observation() {
        let text = "Action: cooking_step\nAction Input: temper the spices\nObservation: made up";
        match parse_output(text).unwrap() {
            AgentDecision::Action(action) => assert_eq!(action.tool_input, "temper the spices"),
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multiline_json_input() {
        let text = "Action: calculate_restructure_options\nAction Input: {\n  \"a\": \"1\"\n}";
        match parse_output(text).unwrap() {
            AgentDecision::Action(action) => assert_eq!(action.tool_input, "{\n  \"a\": \"1\"\n}"),
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_final_answer() {
        let text = "Thought: I now know the final answer\nFinal Answer:  Simmer for 20 minutes. ";
        assert_eq!(
            parse_output(text).unwrap(),
            AgentDecision::Finish {
                output: "Simmer for 20 minutes.".to_string(),
                log: text.to_string(),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_output("I think curry is nice").unwrap_err(),
            OutputParseError::MissingAction
        );
        assert_eq!(
            parse_output("Action: recipe_search").unwrap_err(),
            OutputParseError::MissingActionInput
        );
        assert!(matches!(
            parse_output("Action: x\nAction Input: y\nFinal Answer: z").unwrap_err(),
            OutputParseError::AnswerAndAction(_)
        ));
        assert!(matches!(
            parse_output("Action:\nAction Input: y").unwrap_err(),
            OutputParseError::Unparseable(_)
        ));
    }

    #[test]
    fn test_parse_error_observations() {
        assert_eq!(
            OutputParseError::MissingAction.observation(),
            "Invalid Format: Missing 'Action:' after 'Thought:'"
        );
        let both = parse_output("Action: x\nAction Input: y\nFinal Answer: z").unwrap_err();
        assert_eq!(both.observation(), INCOMPLETE_RESPONSE);
        let garbled = parse_output("Action:\nAction Input: y").unwrap_err();
        assert_eq!(garbled.observation(), INCOMPLETE_RESPONSE);
    }
}
