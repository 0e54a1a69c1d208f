//! Runtime configuration from the environment

use crate::backend::{DEFAULT_MODE, DEFAULT_TIMEOUT};
use crate::state_machine::SessionContext;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_GREETING: &str =
    "Welcome! Ask me a question about Indian law and I'll answer from the indexed statutes.";

/// Configuration for one chat session
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub backend_url: String,
    pub timeout: Duration,
    pub mode: String,
    /// Fixed session id; a fresh one is generated when unset
    pub session_id: Option<String>,
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            mode: DEFAULT_MODE.to_string(),
            session_id: None,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            backend_url: get("RAGCHAT_BACKEND_URL").unwrap_or(defaults.backend_url),
            timeout: get("RAGCHAT_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(defaults.timeout, Duration::from_secs),
            mode: get("RAGCHAT_MODE").unwrap_or(defaults.mode),
            session_id: get("RAGCHAT_SESSION_ID"),
            greeting: get("RAGCHAT_GREETING").unwrap_or(defaults.greeting),
        }
    }

    /// Session identity for a new controller; generated once per call
    pub fn session_context(&self) -> SessionContext {
        let context = match &self.session_id {
            Some(id) => SessionContext::new(id.clone()),
            None => SessionContext::generate(),
        };
        context.with_mode(self.mode.clone())
    }
}
