use super::client::{ChatClient, ChatStream, TraceRun};
use super::request::{ChatCompletionCallOptions, ChatRequest, ChatResponse, Usage};
use super::tracing::TracingProvider;
use crate::config::HuggingFaceSettings;
use crate::types::{CompletionError, Message, MessageType};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, Stop,
    },
    Client as OpenAIClient,
};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;

/// Hugging Face inference router, OpenAI-compatible flavour.
pub const HF_ROUTER_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_HF_MODEL: &str = "mistralai/Mistral-Nemo-Base-2407";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 1000;

/// Chat client for models hosted behind the Hugging Face inference router.
///
/// Decoding is greedy unless a request asks for a temperature.
pub struct HuggingFaceClient {
    client: OpenAIClient<OpenAIConfig>,
    model: String,
    max_new_tokens: u32,
    tracer: Option<Arc<dyn TracingProvider>>,
}

impl HuggingFaceClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, HF_ROUTER_BASE_URL)
    }

    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_token.into())
            .with_api_base(base_url.into());
        Self {
            client: OpenAIClient::with_config(config),
            model: DEFAULT_HF_MODEL.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            tracer: None,
        }
    }

    pub fn from_settings(settings: &HuggingFaceSettings) -> Self {
        Self::with_base_url(settings.api_key.clone(), settings.base_url.clone())
            .with_model(settings.model.clone())
            .with_max_new_tokens(settings.max_new_tokens)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn TracingProvider>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn create_request(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<CreateChatCompletionRequest, CompletionError> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;
        let options = &request.options;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(options.model.clone().unwrap_or_else(|| self.model.clone()))
            .messages(messages)
            .max_tokens(options.max_tokens.unwrap_or(self.max_new_tokens))
            .temperature(options.temperature.unwrap_or(0.0))
            .stream(stream);
        if !options.stop.is_empty() {
            builder.stop(Stop::StringArray(options.stop.clone()));
        }

        Ok(builder.build()?)
    }
}

fn to_openai_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    Ok(match message.message_type {
        MessageType::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.as_str())
            .build()?
            .into(),
        MessageType::AI => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.as_str())
            .build()?
            .into(),
        MessageType::Human => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.as_str())
            .build()?
            .into(),
        MessageType::Tool => ChatCompletionRequestUserMessageArgs::default()
            .content(message.to_string())
            .build()?
            .into(),
    })
}

impl HuggingFaceClient {
    async fn send(
        &self,
        openai_request: CreateChatCompletionRequest,
    ) -> Result<ChatResponse, CompletionError> {
        tracing::debug!(model = %openai_request.model, "sending Hugging Face chat completion");
        let response = self.client.chat().create(openai_request).await?;

        let choice = response
            .choices
            .first()
            .ok_or(CompletionError::EmptyResponse)?;
        let result = ChatResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            model: response.model.clone(),
            finish_reason: choice
                .finish_reason
                .map(|reason| format!("{:?}", reason).to_lowercase()),
            usage: response.usage.as_ref().map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        };

        Ok(result)
    }
}

#[async_trait]
impl ChatClient for HuggingFaceClient {
    async fn complete(
        &self,
        request: ChatRequest,
        options: Option<ChatCompletionCallOptions>,
    ) -> Result<ChatResponse, CompletionError> {
        let openai_request = self.create_request(&request, false)?;
        let run = TraceRun::start(
            self.tracer.clone(),
            "chat_completion",
            "llm",
            &request,
            options.as_ref(),
        )
        .await;

        let result = self.send(openai_request).await;
        run.finish(&result).await;
        result
    }

    async fn complete_stream(
        &self,
        request: ChatRequest,
        options: Option<ChatCompletionCallOptions>,
    ) -> Result<ChatStream, CompletionError> {
        let openai_request = self.create_request(&request, true)?;
        let run = TraceRun::start(
            self.tracer.clone(),
            "chat_completion_stream",
            "chain",
            &request,
            options.as_ref(),
        )
        .await;

        let mut stream = match self.client.chat().create_stream(openai_request).await {
            Ok(stream) => stream,
            Err(e) => {
                let err = CompletionError::from(e);
                run.end(json!({ "error": err.to_string() })).await;
                return Err(err);
            }
        };

        let stream = async_stream::stream! {
            let mut full_response = String::new();
            while let Some(result) = stream.next().await {
                match result {
                    Ok(chunk) => {
                        for choice in chunk.choices {
                            if let Some(content) = choice.delta.content {
                                full_response.push_str(&content);
                                yield Ok(content);
                            }
                        }
                    }
                    Err(e) => yield Err(CompletionError::from(e)),
                }
            }

            run.end(json!({ "streamed_content": full_response })).await;
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ChatCompletionRequestOptions;

    #[test]
    fn test_request_uses_client_defaults() {
        let client = HuggingFaceClient::new("hf_test");
        let request = ChatRequest::prompt("What is the best method for making bread?");

        let built = client.create_request(&request, false).unwrap();
        assert_eq!(built.model, DEFAULT_HF_MODEL);
        assert_eq!(built.messages.len(), 1);
        assert_eq!(built.temperature, Some(0.0));
        assert!(built.stop.is_none());
    }

    #[test]
    fn test_request_options_override_defaults() {
        let client = HuggingFaceClient::new("hf_test").with_model("other/model");
        let request = ChatRequest::new(
            vec![Message::system("Be brief"), Message::human("Hi")],
            ChatCompletionRequestOptions::default()
                .with_temperature(0.5)
                .with_stop("\nObservation:"),
        );

        let built = client.create_request(&request, true).unwrap();
        assert_eq!(built.model, "other/model");
        assert_eq!(built.messages.len(), 2);
        assert_eq!(built.temperature, Some(0.5));
        assert_eq!(built.stream, Some(true));
        assert!(matches!(built.stop, Some(Stop::StringArray(ref s)) if s == &vec!["\nObservation:".to_string()]));
    }
}
