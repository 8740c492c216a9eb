use super::request::{ChatCompletionCallOptions, ChatRequest, ChatResponse};
use super::tracing::{RunStart, TracingProvider};
use crate::types::CompletionError;
use async_trait::async_trait;
use futures::Stream;
use serde_json::{json, Value};
use std::pin::Pin;
use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

/// Stream of text deltas from a completion
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        request: ChatRequest,
        options: Option<ChatCompletionCallOptions>,
    ) -> Result<ChatResponse, CompletionError>;

    /// Stream the completion as text deltas. Clients without native streaming
    /// yield the whole response as one chunk.
    async fn complete_stream(
        &self,
        request: ChatRequest,
        options: Option<ChatCompletionCallOptions>,
    ) -> Result<ChatStream, CompletionError> {
        let response = self.complete(request, options).await?;
        Ok(Box::pin(futures::stream::once(async move {
            Ok(response.content)
        })))
    }
}

/// Run bookkeeping shared by the provider clients.
pub(crate) struct TraceRun {
    tracer: Option<Arc<dyn TracingProvider>>,
    trace_id: String,
}

impl TraceRun {
    pub(crate) async fn start(
        tracer: Option<Arc<dyn TracingProvider>>,
        name: &str,
        run_type: &str,
        request: &ChatRequest,
        options: Option<&ChatCompletionCallOptions>,
    ) -> Self {
        let trace_id = options
            .and_then(|o| o.trace_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let parent_trace_id = options.and_then(|o| o.parent_trace_id.clone());

        if let Some(tracer) = &tracer {
            let inputs = serde_json::to_value(request)
                .unwrap_or_else(|_| json!({ "error": "Failed to serialize request" }));
            let run = RunStart {
                id: &trace_id,
                name,
                run_type,
                inputs: &inputs,
                parent_id: parent_trace_id.as_deref(),
                started_at: SystemTime::now(),
            };
            if let Err(e) = tracer.start_trace(run).await {
                tracing::warn!(error = %e, "failed to start trace");
            }
        }

        Self { tracer, trace_id }
    }

    /// Close the run with the response, or with the error that ended the call.
    pub(crate) async fn finish(self, result: &Result<ChatResponse, CompletionError>) {
        let outputs = match result {
            Ok(response) => serde_json::to_value(response).unwrap_or_default(),
            Err(e) => json!({ "error": e.to_string() }),
        };
        self.end(outputs).await;
    }

    pub(crate) async fn end(self, outputs: Value) {
        if let Some(tracer) = &self.tracer {
            if let Err(e) = tracer
                .end_trace(&self.trace_id, &outputs, SystemTime::now())
                .await
            {
                tracing::warn!(error = %e, "failed to end trace");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{ChatCompletionRequestOptions, TracingError};
    use crate::types::Message;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TracingProvider for Recorder {
        async fn start_trace(&self, run: RunStart<'_>) -> Result<(), TracingError> {
            self.events.lock().unwrap().push(format!(
                "start {} parent={:?} {}",
                run.id, run.parent_id, run.run_type
            ));
            Ok(())
        }

        async fn end_trace(
            &self,
            run_id: &str,
            outputs: &Value,
            _ended_at: SystemTime,
        ) -> Result<(), TracingError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("end {run_id} {outputs}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_trace_run_uses_call_option_ids() {
        let recorder = Arc::new(Recorder::default());
        let request = ChatRequest::new(
            vec![Message::human("knead?")],
            ChatCompletionRequestOptions::default(),
        );
        let options = ChatCompletionCallOptions::new(Some("run-7".into()), Some("root".into()));

        let run = TraceRun::start(
            Some(recorder.clone() as Arc<dyn TracingProvider>),
            "chat",
            "llm",
            &request,
            Some(&options),
        )
        .await;
        run.end(json!({"content": "yes"})).await;

        let events = recorder.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start run-7 parent=Some(\"root\") llm".to_string(),
                "end run-7 {\"content\":\"yes\"}".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_call_closes_run_with_error() {
        let recorder = Arc::new(Recorder::default());
        let request = ChatRequest::new(vec![], ChatCompletionRequestOptions::default());
        let options = ChatCompletionCallOptions::new(Some("run-9".into()), None);

        let run = TraceRun::start(
            Some(recorder.clone() as Arc<dyn TracingProvider>),
            "chat",
            "llm",
            &request,
            Some(&options),
        )
        .await;
        run.finish(&Err(CompletionError::Authentication)).await;

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            "end run-9 {\"error\":\"Authentication failed: check the API key\"}"
        );
    }

    #[tokio::test]
    async fn test_default_stream_yields_single_chunk() {
        use futures::StreamExt;

        struct Fixed;

        #[async_trait]
        impl ChatClient for Fixed {
            async fn complete(
                &self,
                _request: ChatRequest,
                _options: Option<ChatCompletionCallOptions>,
            ) -> Result<ChatResponse, CompletionError> {
                Ok(ChatResponse::text("whole answer"))
            }
        }

        let request = ChatRequest::new(vec![], ChatCompletionRequestOptions::default());
        let chunks: Vec<_> = Fixed.complete_stream(request, None).await.unwrap().collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), "whole answer");
    }
}
