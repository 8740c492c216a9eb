use super::client::{ChatClient, TraceRun};
use super::request::{ChatCompletionCallOptions, ChatRequest, ChatResponse, Usage};
use super::tracing::TracingProvider;
use crate::config::AnthropicSettings;
use crate::types::{CompletionError, MessageType};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_ANTHROPIC_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 1000;

/// Chat client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    tracer: Option<Arc<dyn TracingProvider>>,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            temperature: DEFAULT_ANTHROPIC_TEMPERATURE,
            max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
            tracer: None,
        }
    }

    pub fn from_settings(settings: &AnthropicSettings) -> Self {
        Self::new(settings.api_key.clone())
            .with_base_url(settings.base_url.clone())
            .with_model(settings.model.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn TracingProvider>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn create_request(&self, request: &ChatRequest) -> MessagesRequest {
        let mut system: Vec<&str> = Vec::new();
        let mut messages: Vec<AnthropicMessage> = Vec::new();

        for message in &request.messages {
            let (role, text) = match message.message_type {
                MessageType::System => {
                    system.push(&message.content);
                    continue;
                }
                MessageType::Human => ("user", message.content.clone()),
                MessageType::AI => ("assistant", message.content.clone()),
                MessageType::Tool => ("user", message.to_string()),
            };

            // Consecutive turns from the same side are merged into one message.
            match messages.last_mut() {
                Some(last) if last.role == role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(&text);
                }
                _ => messages.push(AnthropicMessage {
                    role,
                    content: text,
                }),
            }
        }

        let options = &request.options;
        MessagesRequest {
            model: options.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            max_tokens: options.max_tokens.unwrap_or(self.max_tokens),
            temperature: Some(options.temperature.unwrap_or(self.temperature)),
            stop_sequences: (!options.stop.is_empty()).then(|| options.stop.clone()),
        }
    }
}

impl AnthropicClient {
    async fn send(&self, body: &MessagesRequest) -> Result<ChatResponse, CompletionError> {
        tracing::debug!(model = %body.model, messages = body.messages.len(), "sending Anthropic request");
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                429 => CompletionError::RateLimited { retry_after: None },
                401 => CompletionError::Authentication,
                _ => CompletionError::Api { status, message },
            });
        }

        let api_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content: String = api_response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();

        let result = ChatResponse {
            content,
            model: api_response.model,
            finish_reason: api_response.stop_reason,
            usage: Some(Usage {
                prompt_tokens: api_response.usage.input_tokens,
                completion_tokens: api_response.usage.output_tokens,
                total_tokens: api_response.usage.input_tokens + api_response.usage.output_tokens,
            }),
        };

        Ok(result)
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(
        &self,
        request: ChatRequest,
        options: Option<ChatCompletionCallOptions>,
    ) -> Result<ChatResponse, CompletionError> {
        let body = self.create_request(&request);
        let run = TraceRun::start(
            self.tracer.clone(),
            "anthropic_messages",
            "llm",
            &request,
            options.as_ref(),
        )
        .await;

        let result = self.send(&body).await;
        run.finish(&result).await;
        result
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
