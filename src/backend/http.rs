//! HTTP implementation of the chat backend

use super::error::{BackendError, BackendErrorKind};
use super::types::{
    ChatRequest, ChatResponse, HealthResponse, RetrieveRequest, RetrieveResponse, RetrievedChunk,
};
use super::ChatBackend;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default wait budget for one backend call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the RAG backend over JSON/HTTP
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::request_construction(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and hand back the decoded body of a 2xx response.
    ///
    /// Non-JSON success bodies decode to `Value::Null`. A non-2xx status is a
    /// server failure even when its body cannot be read.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, BackendError> {
        let request = request
            .build()
            .map_err(|e| BackendError::request_construction(format!("Invalid request: {e}")))?;

        let response = self.client.execute(request).await.map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => serde_json::from_str::<Value>(&text)
                    .ok()
                    .or_else(|| (!text.is_empty()).then(|| Value::String(text))),
                Err(e) => {
                    tracing::warn!(status = %status, error = %e, "Failed to read error body");
                    None
                }
            };
            return Err(BackendError::server(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;
        let parsed = serde_json::from_str::<Value>(&body).ok();
        if parsed.is_none() {
            tracing::warn!(status = %status, "Backend returned a non-JSON body");
        }
        Ok(parsed.unwrap_or(Value::Null))
    }

    async fn post_json<S: Serialize + ?Sized>(&self, path: &str, payload: &S) -> Result<Value, BackendError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| BackendError::request_construction(format!("Failed to encode request: {e}")))?;
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.execute(request).await
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, BackendError> {
        serde_json::from_value(value)
            .map_err(|e| BackendError::new(BackendErrorKind::Server, format!("Unexpected response shape: {e}")))
    }
}

fn classify_send_error(e: reqwest::Error) -> BackendError {
    if e.is_builder() {
        BackendError::request_construction(format!("Invalid request: {e}"))
    } else if e.is_timeout() {
        BackendError::network(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        BackendError::network(format!("Connection failed: {e}"))
    } else {
        BackendError::network(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let body = self.post_json("/chat", request).await?;
        Ok(ChatResponse::from_value(&body))
    }

    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError> {
        let body = self.post_json("/retrieve", request).await?;
        let response: RetrieveResponse = Self::decode(body)?;
        Ok(response.results)
    }

    async fn health(&self) -> Result<(), BackendError> {
        let body = self.execute(self.client.get(self.url("/health"))).await?;
        let health: HealthResponse = Self::decode(body)?;
        if health.status == "ok" {
            Ok(())
        } else {
            Err(BackendError::new(
                BackendErrorKind::Server,
                format!("Backend reported status {}", health.status),
            ))
        }
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
