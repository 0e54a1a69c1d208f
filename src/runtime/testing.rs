//! Mock implementations for testing
//!
//! These mocks let the controller run without a real backend.

use crate::backend::{
    BackendError, ChatBackend, ChatRequest, ChatResponse, RetrieveRequest, RetrievedChunk,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Backend
// ============================================================================

/// Mock backend that returns queued results
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    chunks: Mutex<Vec<RetrievedChunk>>,
    healthy: bool,
    /// Record of all chat requests made
    pub requests: Mutex<Vec<ChatRequest>>,
    /// Record of all retrieve requests made
    pub retrievals: Mutex<Vec<RetrieveRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            chunks: Mutex::new(Vec::new()),
            healthy: true,
            requests: Mutex::new(Vec::new()),
            retrievals: Mutex::new(Vec::new()),
        }
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: ChatResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: BackendError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Chunks returned by every retrieve call
    pub fn set_chunks(&self, chunks: Vec<RetrievedChunk>) {
        *self.chunks.lock().unwrap() = chunks;
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn recorded_retrievals(&self) -> Vec<RetrieveRequest> {
        self.retrievals.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<ChatResponse, BackendError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock response queued")))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError> {
        self.retrievals.lock().unwrap().push(request.clone());
        let chunks = self.chunks.lock().unwrap();
        Ok(chunks.iter().take(request.k as usize).cloned().collect())
    }

    async fn health(&self) -> Result<(), BackendError> {
        if self.healthy {
            Ok(())
        } else {
            Err(BackendError::network("mock backend is down"))
        }
    }

    fn endpoint(&self) -> &str {
        "mock://backend"
    }
}

// ============================================================================
// Delayed Mock Backend (for in-flight testing)
// ============================================================================

/// Mock backend that holds every chat call for a fixed delay
pub struct DelayedMockBackend {
    inner: MockBackend,
    delay: Duration,
    /// Notified when a chat request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockBackend::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_response(&self, response: ChatResponse) {
        self.inner.queue_response(response);
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl ChatBackend for DelayedMockBackend {
    async fn send_conversation(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        // notify_one keeps a permit if nobody is waiting yet
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    async fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<RetrievedChunk>, BackendError> {
        self.inner.retrieve(request).await
    }

    async fn health(&self) -> Result<(), BackendError> {
        self.inner.health().await
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
