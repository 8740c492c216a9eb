use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::SystemTime;
use thiserror::Error;

pub const LANGSMITH_BASE_URL: &str = "https://api.smith.langchain.com";

#[derive(Error, Debug)]
pub enum TracingError {
    #[error("Tracing HttpError: {0}")]
    HttpError(String),
    #[error("Tracing Other: {0}")]
    Other(String),
}

/// Opening record of a model call.
#[derive(Debug, Clone, Serialize)]
pub struct RunStart<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub run_type: &'a str,
    pub inputs: &'a Value,
    #[serde(rename = "parent_run_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<&'a str>,
    #[serde(rename = "start_time", serialize_with = "as_rfc3339")]
    pub started_at: SystemTime,
}

#[derive(Serialize)]
struct RunEnd<'a> {
    outputs: &'a Value,
    #[serde(serialize_with = "as_rfc3339")]
    end_time: SystemTime,
}

/// Receives the start and end of every model call.
#[async_trait]
pub trait TracingProvider: Send + Sync {
    async fn start_trace(&self, run: RunStart<'_>) -> Result<(), TracingError>;

    async fn end_trace(
        &self,
        run_id: &str,
        outputs: &Value,
        ended_at: SystemTime,
    ) -> Result<(), TracingError>;
}

/// Posts runs to the LangSmith API.
pub struct LangSmithTracer {
    base_url: String,
    api_key: String,
    http: Client,
}

impl LangSmithTracer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: LANGSMITH_BASE_URL.to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<(), TracingError> {
        let resp = request
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| TracingError::HttpError(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TracingError::HttpError(format!(
            "{action} failed: HTTP {status} - {body}"
        )))
    }
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn as_rfc3339<S: serde::Serializer>(time: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&rfc3339(*time))
}

#[async_trait]
impl TracingProvider for LangSmithTracer {
    async fn start_trace(&self, run: RunStart<'_>) -> Result<(), TracingError> {
        let url = format!("{}/runs", self.base_url);
        self.send(self.http.post(url).json(&run), "start_trace").await
    }

    async fn end_trace(
        &self,
        run_id: &str,
        outputs: &Value,
        ended_at: SystemTime,
    ) -> Result<(), TracingError> {
        let url = format!("{}/runs/{run_id}", self.base_url);
        let body = RunEnd {
            outputs,
            end_time: ended_at,
        };
        self.send(self.http.patch(url).json(&body), "end_trace").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_timestamps_are_rfc3339_millis() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(rfc3339(t), "1970-01-01T00:00:01.500Z");
    }

    #[test]
    fn test_run_start_wire_shape() {
        let inputs = json!({"messages": []});
        let run = RunStart {
            id: "run-1",
            name: "anthropic_chat",
            run_type: "llm",
            inputs: &inputs,
            parent_id: None,
            started_at: UNIX_EPOCH,
        };
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["run_type"], "llm");
        assert_eq!(json["start_time"], "1970-01-01T00:00:00.000Z");
        assert!(json.get("parent_run_id").is_none());

        let child = RunStart {
            parent_id: Some("root"),
            ..run
        };
        assert_eq!(serde_json::to_value(&child).unwrap()["parent_run_id"], "root");
    }
}
