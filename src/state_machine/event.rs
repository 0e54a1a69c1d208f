//! Events that drive a submission

use crate::backend::{BackendError, ChatResponse};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// User pressed send with this raw input
    Submit { text: String },

    /// The backend call settled successfully
    ReplyReceived { response: ChatResponse },

    /// The backend call settled with a failure
    RequestFailed { error: BackendError },

    /// Release the busy gate; runs once per accepted submission
    Finalize,
}
