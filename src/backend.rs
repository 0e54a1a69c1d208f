//! Chat backend abstraction
//!
//! The engine depends on one remote capability, "send a conversation, get a
//! structured reply". Retrieval and health checks ride along on the same
//! boundary but are not part of the submission path.

mod error;
mod http;
mod normalize;
mod types;


pub use error::{BackendError, BackendErrorKind};
pub use http::{HttpBackend, DEFAULT_TIMEOUT};
pub use normalize::FALLBACK_REPLY;
pub use types::{ChatRequest, ChatResponse, RetrieveRequest, RetrievedChunk, DEFAULT_MODE};

use async_trait::async_trait;
use std::sync::Arc;

/// Remote chat interface
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the full conversation so far; settles exactly once
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    /// Ranked chunks matching a query
    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError>;

    /// Liveness probe
    async fn health(&self) -> Result<(), BackendError>;

    /// Where requests go, for logs
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        (**self).send_conversation(request).await
    }

    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError> {
        (**self).retrieve(request).await
    }

    async fn health(&self) -> Result<(), BackendError> {
        (**self).health().await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for chat backends
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B: ChatBackend> LoggingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for LoggingBackend<B> {
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        tracing::debug!(
            session_id = %request.session_id,
            question = request.latest_text().unwrap_or_default(),
            "Sending chat request"
        );
        let start = std::time::Instant::now();
        let result = self.inner.send_conversation(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    session_id = %request.session_id,
                    messages = request.messages.len(),
                    duration_ms = %duration.as_millis(),
                    citations = response.citations.len(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    body = ?e.body,
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.retrieve(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(chunks) => tracing::info!(
                k = request.k,
                results = chunks.len(),
                duration_ms = %duration.as_millis(),
                "Retrieve completed"
            ),
            Err(e) => tracing::error!(
                k = request.k,
                duration_ms = %duration.as_millis(),
                kind = ?e.kind,
                error = %e.message,
                "Retrieve failed"
            ),
        }

        result
    }

    async fn health(&self) -> Result<(), BackendError> {
        let result = self.inner.health().await;
        if let Err(e) = &result {
            tracing::warn!(endpoint = %self.inner.endpoint(), error = %e, "Health check failed");
        }
        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
