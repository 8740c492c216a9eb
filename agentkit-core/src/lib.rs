//! Building blocks for small LLM programs: provider-neutral chat clients, a
//! state graph runtime, typed tools and a reason/act agent on top of them.

#![allow(unused_extern_crates)]
extern crate self as agentkit_core;

pub mod agent;
pub mod completion;
pub mod config;
pub mod graph;
pub mod node;
pub mod tool;
pub mod types;

pub use async_trait::async_trait;

pub mod prelude {
    //! Convenient re-exports of commonly used types
    pub use crate::agent::{
        AgentError, AgentStep, ReactAgent, ReactConfig, ReactState, EXCEPTION_TOOL,
        INCOMPLETE_RESPONSE, ITERATION_LIMIT_MESSAGE, STOP_SEQUENCE,
    };
    pub use crate::completion::{
        AnthropicClient, ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions,
        ChatRequest, ChatResponse, ChatStream, HuggingFaceClient, LangSmithTracer, RunStart,
        TracingError, TracingProvider, Usage,
    };
    pub use crate::config::{load_dotenv, AnthropicSettings, ConfigError, HuggingFaceSettings};
    pub use crate::graph::{Built, Condition, Edge, Graph, NotBuilt, END, START};
    pub use crate::node::{Context, FunctionNode, Node, NodeConfig};
    pub use crate::tool::{DynTool, ToolBox, ToolFunction};
    pub use crate::types::{
        CompletionError, GraphError, GraphResult, GraphState, Message, MessageType, NodeError,
        NodeOutput, NodeResult, ToolError,
    };
    pub use agentkit_macros::{tools, State};
}

pub use prelude::*;
