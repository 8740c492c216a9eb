//! Provider clients configured from the environment, with LangSmith run
//! tracing attached when `LANGSMITH_API_KEY` is set.

use agentkit_core::config::langsmith_api_key;
use agentkit_core::{
    AnthropicClient, AnthropicSettings, ConfigError, HuggingFaceClient, HuggingFaceSettings,
    LangSmithTracer, TracingProvider,
};
use std::sync::Arc;

fn tracer() -> Option<Arc<dyn TracingProvider>> {
    let key = langsmith_api_key()?;
    tracing::debug!("LangSmith tracing enabled");
    Some(Arc::new(LangSmithTracer::new(key)))
}

/// Hugging Face client from `HF_API_KEY`, optionally overriding the model.
pub fn huggingface_client(model: Option<&str>) -> Result<HuggingFaceClient, ConfigError> {
    let mut settings = HuggingFaceSettings::from_env()?;
    if let Some(model) = model {
        settings.model = model.to_string();
    }

    let client = HuggingFaceClient::from_settings(&settings);
    tracing::info!(model = %client.model(), "Hugging Face client initialized");
    Ok(match tracer() {
        Some(tracer) => client.with_tracer(tracer),
        None => client,
    })
}

/// Anthropic client from `ANTHROPIC_API_KEY`.
pub fn anthropic_client() -> Result<AnthropicClient, ConfigError> {
    let settings = AnthropicSettings::from_env()?;
    let client = AnthropicClient::from_settings(&settings);
    tracing::info!(model = %client.model(), "Anthropic client initialized");
    Ok(match tracer() {
        Some(tracer) => client.with_tracer(tracer),
        None => client,
    })
}
