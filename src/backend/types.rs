//! Wire types for the chat backend

use crate::transcript::{Citation, MessageRecord, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default conversation mode sent with every request
pub const DEFAULT_MODE: &str = "default";

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub messages: Vec<OutboundMessage>,
    pub mode: String,
}

impl ChatRequest {
    pub fn new(
        session_id: impl Into<String>,
        records: &[MessageRecord],
        mode: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            messages: records.iter().map(OutboundMessage::from).collect(),
            mode: mode.into(),
        }
    }

    pub fn latest_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }
}

/// `{role, text}` pair as the backend expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub text: String,
}

impl From<&MessageRecord> for OutboundMessage {
    fn from(record: &MessageRecord) -> Self {
        Self {
            role: record.role,
            text: record.text.clone(),
        }
    }
}

/// Normalized success body of `POST /chat`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub reply: Option<String>,
    pub answer: Option<String>,
    pub citations: Vec<Citation>,
    pub debug: Option<Value>,
}

/// Body of `POST /retrieve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrieveRequest {
    pub query: String,
    pub k: u32,
}

impl RetrieveRequest {
    pub const DEFAULT_K: u32 = 5;
    pub const MAX_K: u32 = 25;

    /// Build a request with `k` clamped to the bounds the backend accepts
    pub fn new(query: impl Into<String>, k: u32) -> Self {
        Self {
            query: query.into(),
            k: k.clamp(1, Self::MAX_K),
        }
    }
}

/// One ranked chunk returned by retrieval
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedChunk {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub chunk_index: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetrieveResponse {
    #[serde(default)]
    pub results: Vec<RetrievedChunk>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}
