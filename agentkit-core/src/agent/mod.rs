//! Text-based reason/act agent.
//!
//! The model answers in the `Thought: / Action: / Action Input:` format,
//! the named tool is run and its result is appended to the scratchpad as an
//! `Observation:`, until the model gives a `Final Answer:` or the iteration
//! limit is reached.

mod config;
mod parser;
mod prompt;
mod react;

pub use config::ReactConfig;
pub use parser::{
    parse_output, AgentAction, AgentDecision, OutputParseError, FINAL_ANSWER, INCOMPLETE_RESPONSE,
};
pub use prompt::{build_template, render, scratchpad, STOP_SEQUENCE};
pub use react::{
    AgentError, AgentStep, ReactAgent, ReactState, ReactStateUpdate, EXCEPTION_TOOL,
    ITERATION_LIMIT_MESSAGE,
};
