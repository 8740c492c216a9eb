use async_openai::error::OpenAIError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for chat completion calls
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Authentication failed: check the API key")]
    Authentication,

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider: {0}")]
    Provider(String),

    #[error("Network: {0}")]
    Network(String),

    #[error("Parse: {0}")]
    Parse(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

impl CompletionError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CompletionError::RateLimited { .. })
    }
}

impl From<OpenAIError> for CompletionError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api) => {
                let message = api.message.to_lowercase();
                if message.contains("rate limit") || message.contains("rate_limit") {
                    CompletionError::RateLimited { retry_after: None }
                } else {
                    CompletionError::Provider(api.message)
                }
            }
            OpenAIError::Reqwest(e) => CompletionError::Network(e.to_string()),
            OpenAIError::JSONDeserialize(e) => CompletionError::Parse(e.to_string()),
            other => CompletionError::Provider(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CompletionError::Parse(err.to_string())
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

/// Error type for tool operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ToolError {
    #[error("Schema: {0}")]
    Schema(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution: {0}")]
    Execution(String),

    #[error("Serialization: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Serialization(err.to_string())
    }
}

/// Error type for node operations
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum NodeError {
    #[error("Node execution: {0}")]
    Execution(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Model: {0}")]
    ModelError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<CompletionError> for NodeError {
    fn from(err: CompletionError) -> Self {
        if err.is_rate_limited() {
            NodeError::RateLimited(err.to_string())
        } else {
            NodeError::ModelError(err.to_string())
        }
    }
}

/// Error type for overall graph operations
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("Other: {0}")]
    Other(String),
}

impl GraphError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GraphError::Node(NodeError::RateLimited(_)))
    }
}
