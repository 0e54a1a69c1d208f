//! Effects produced by state transitions

use crate::transcript::MessageRecord;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the user's message before the backend has seen it
    AppendOptimistic { record: MessageRecord },

    /// Send the transcript so far to the backend
    SendConversation,

    /// Replace the optimistic record with the committed pair
    Reconcile {
        user: MessageRecord,
        assistant: MessageRecord,
    },

    /// Append a standalone assistant record (failure notices)
    AppendAssistant { record: MessageRecord },
}
