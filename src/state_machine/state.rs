//! Submission state types

use crate::backend::{BackendErrorKind, DEFAULT_MODE};
use crate::transcript::MessageRecord;

/// Where the current submission is in its cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitState {
    /// Ready for input
    #[default]
    Idle,

    /// Optimistic record appended, backend call in flight
    Submitting { pending: MessageRecord },

    /// Reply reconciled into the transcript, waiting for finalization
    Resolved,

    /// Failure notice appended, waiting for finalization
    Failed { kind: BackendErrorKind },
}

impl SubmitState {
    /// The busy gate: anything but `Idle` refuses new submissions
    pub fn is_busy(&self) -> bool {
        !matches!(self, SubmitState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmitState::Idle => "idle",
            SubmitState::Submitting { .. } => "submitting",
            SubmitState::Resolved => "resolved",
            SubmitState::Failed { .. } => "failed",
        }
    }
}

/// Immutable per-session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Opaque token, stable for the session's lifetime
    pub session_id: String,
    pub mode: String,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            mode: DEFAULT_MODE.to_string(),
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Fresh random session id
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}
