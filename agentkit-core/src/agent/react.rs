use super::config::ReactConfig;
use super::parser::{parse_output, AgentAction, AgentDecision};
use super::prompt::{self, STOP_SEQUENCE};
use crate::completion::{ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, ChatRequest};
use crate::graph::{Built, Graph, END, START};
use crate::node::{Context, Node};
use crate::tool::ToolBox;
use crate::types::{GraphError, Message, NodeError, NodeOutput, NodeResult};
use agentkit_macros::State;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

/// Pseudo tool whose observation is its input, used to report parse errors.
pub const EXCEPTION_TOOL: &str = "_Exception";

const REASON: &str = "reason";
const ACT: &str = "act";
const LOG_TARGET: &str = "agentkit::react";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("agent input is empty")]
    EmptyInput,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("agent finished without an answer")]
    NoOutput,
}

impl AgentError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AgentError::Graph(e) if e.is_rate_limited())
    }
}

/// A tool call and what it returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    pub action: AgentAction,
    pub observation: String,
}

#[derive(State, Debug, Clone, Default)]
pub struct ReactState {
    pub input: String,
    #[update(append)]
    pub steps: Vec<AgentStep>,
    pub pending: Option<AgentAction>,
    pub output: Option<String>,
    pub iterations: usize,
}

struct ReasonNode {
    client: Arc<dyn ChatClient>,
    template: String,
    config: ReactConfig,
}

impl fmt::Debug for ReasonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonNode")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl Node<ReactState> for ReasonNode {
    async fn process(&self, ctx: &Context, state: ReactState) -> NodeResult<ReactState> {
        if state.iterations >= self.config.max_iterations {
            tracing::debug!(target: LOG_TARGET, iterations = state.iterations, "iteration limit reached");
            return Ok(NodeOutput::Updates(vec![
                ReactStateUpdate::Pending(None),
                ReactStateUpdate::Output(Some(ITERATION_LIMIT_MESSAGE.to_string())),
            ]));
        }

        let prompt = prompt::render(&self.template, &state.input, &state.steps);
        let request = ChatRequest::new(
            vec![Message::human(prompt)],
            ChatCompletionRequestOptions::default().with_stop(STOP_SEQUENCE),
        );
        let call_ctx = ctx.child();
        let call_options =
            ChatCompletionCallOptions::new(Some(call_ctx.trace_id), call_ctx.parent_trace_id);

        let text = self.client.complete(request, Some(call_options)).await?.content;
        if self.config.verbose {
            tracing::info!(target: LOG_TARGET, "{}", text.trim());
        }

        let iterations = ReactStateUpdate::Iterations(state.iterations + 1);
        let decision = match parse_output(&text) {
            Ok(decision) => decision,
            Err(e) if self.config.handle_parsing_errors => {
                tracing::debug!(target: LOG_TARGET, error = %e, "model output did not parse");
                AgentDecision::Action(AgentAction {
                    tool: EXCEPTION_TOOL.to_string(),
                    tool_input: e.observation(),
                    log: text,
                })
            }
            Err(e) => return Err(NodeError::Execution(e.to_string())),
        };

        Ok(NodeOutput::Updates(match decision {
            AgentDecision::Finish { output, .. } => vec![
                iterations,
                ReactStateUpdate::Pending(None),
                ReactStateUpdate::Output(Some(output)),
            ],
            AgentDecision::Action(action) => {
                vec![iterations, ReactStateUpdate::Pending(Some(action))]
            }
        }))
    }

    fn name(&self) -> &str {
        REASON
    }
}

#[derive(Debug)]
struct ActNode {
    tools: ToolBox,
    verbose: bool,
}

impl ActNode {
    async fn observe(&self, action: &AgentAction) -> String {
        if action.tool == EXCEPTION_TOOL {
            return action.tool_input.clone();
        }
        if self.tools.get(&action.tool).is_none() {
            return format!(
                "{} is not a valid tool, try one of [{}].",
                action.tool,
                self.tools.names().join(", ")
            );
        }
        match self.tools.invoke(&action.tool, &action.tool_input).await {
            Ok(observation) => observation,
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[async_trait]
impl Node<ReactState> for ActNode {
    async fn process(&self, _ctx: &Context, state: ReactState) -> NodeResult<ReactState> {
        let Some(action) = state.pending else {
            return Ok(NodeOutput::unchanged());
        };

        let observation = self.observe(&action).await;
        if self.verbose {
            tracing::info!(target: LOG_TARGET, tool = %action.tool, "Observation: {}", observation);
        }

        Ok(NodeOutput::Updates(vec![
            ReactStateUpdate::Pending(None),
            ReactStateUpdate::Steps(vec![AgentStep {
                action,
                observation,
            }]),
        ]))
    }

    fn name(&self) -> &str {
        ACT
    }
}

fn route(state: &ReactState) -> String {
    match (&state.output, &state.pending) {
        (None, Some(_)) => ACT.to_string(),
        _ => END.to_string(),
    }
}

/// Reason/act loop over a set of tools, run as a two-node graph.
pub struct ReactAgent {
    graph: Graph<ReactState, Built>,
    tools: Vec<String>,
}

impl ReactAgent {
    pub fn new(
        client: Arc<dyn ChatClient>,
        tools: ToolBox,
        config: ReactConfig,
    ) -> Result<Self, AgentError> {
        let tool_names = tools.names().into_iter().map(str::to_string).collect();

        let mut graph = Graph::new("react_agent");
        graph
            .add_node(ReasonNode {
                client,
                template: prompt::build_template(&tools),
                config: config.clone(),
            })
            .add_node(ActNode {
                tools,
                verbose: config.verbose,
            })
            .add_edge(START, REASON)
            .add_conditional_edge(REASON, route)
            .add_edge(ACT, REASON)
            .with_recursion_limit(config.recursion_limit());

        Ok(Self {
            graph: graph.build()?,
            tools: tool_names,
        })
    }

    pub fn tool_names(&self) -> &[String] {
        &self.tools
    }

    /// Answer a question, returning the final answer text.
    pub async fn run(&self, input: &str) -> Result<String, AgentError> {
        let state = self.execute(&Context::default(), input).await?;
        state.output.ok_or(AgentError::NoOutput)
    }

    /// Run the loop and return the final state, including every step taken.
    pub async fn execute(&self, ctx: &Context, input: &str) -> Result<ReactState, AgentError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let state = ReactState {
            input: input.to_string(),
            ..Default::default()
        };
        Ok(self.graph.run(ctx, state).await?)
    }
}

impl fmt::Debug for ReactAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactAgent")
            .field("tools", &self.tools)
            .finish()
    }
}
