mod anthropic;
mod client;
mod huggingface;
mod request;
mod tracing;

pub use anthropic::{
    AnthropicClient, ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MAX_TOKENS, DEFAULT_ANTHROPIC_MODEL,
    DEFAULT_ANTHROPIC_TEMPERATURE,
};
pub use client::{ChatClient, ChatStream};
pub use huggingface::{
    HuggingFaceClient, DEFAULT_HF_MODEL, DEFAULT_MAX_NEW_TOKENS, HF_ROUTER_BASE_URL,
};
pub use request::{
    ChatCompletionCallOptions, ChatCompletionRequestOptions, ChatRequest, ChatResponse, Usage,
};
pub use tracing::{LangSmithTracer, RunStart, TracingError, TracingProvider, LANGSMITH_BASE_URL};
