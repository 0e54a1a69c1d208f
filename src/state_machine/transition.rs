//! Pure state transition function

use super::{Effect, Event, SubmitState};
use crate::backend::{ChatResponse, FALLBACK_REPLY};
use crate::transcript::MessageRecord;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SubmitState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SubmitState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A message is already being answered")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function: same inputs, same outputs, no I/O.
pub fn transition(state: &SubmitState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyInput),

        (SubmitState::Idle, Event::Submit { text }) => {
            let record = MessageRecord::user(text.trim());
            Ok(TransitionResult::new(SubmitState::Submitting {
                pending: record.clone(),
            })
            .with_effect(Effect::AppendOptimistic { record })
            .with_effect(Effect::SendConversation))
        }

        (_, Event::Submit { .. }) => Err(TransitionError::Busy),

        (SubmitState::Submitting { pending }, Event::ReplyReceived { response }) => {
            Ok(TransitionResult::new(SubmitState::Resolved).with_effect(Effect::Reconcile {
                user: pending.clone(),
                assistant: assistant_record(response),
            }))
        }

        (SubmitState::Submitting { .. }, Event::RequestFailed { error }) => {
            let record = MessageRecord::assistant(error.user_message());
            Ok(TransitionResult::new(SubmitState::Failed { kind: error.kind })
                .with_effect(Effect::AppendAssistant { record }))
        }

        (_, Event::Finalize) => Ok(TransitionResult::new(SubmitState::Idle)),

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in state {}",
            state.name()
        ))),
    }
}

fn assistant_record(response: ChatResponse) -> MessageRecord {
    let text = response
        .reply_text()
        .unwrap_or_else(|_| FALLBACK_REPLY.to_string());
    MessageRecord::assistant(text)
        .with_citations(response.citations)
        .with_debug_info(response.debug)
}
