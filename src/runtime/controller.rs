//! Session controller

use crate::backend::{BackendError, ChatBackend, ChatRequest, RetrieveRequest, RetrievedChunk};
use crate::state_machine::{transition, Effect, Event, SessionContext, SubmitState, TransitionError};
use crate::transcript::{Transcript, TranscriptStore};
use std::collections::VecDeque;
use tokio::sync::watch;

/// What the presentation layer needs to know about the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: String,
    pub busy: bool,
}

/// Drives one request/response cycle per accepted submission
pub struct SessionController<B: ChatBackend> {
    context: SessionContext,
    state: watch::Sender<SubmitState>,
    store: TranscriptStore,
    backend: B,
}

impl<B: ChatBackend> SessionController<B> {
    /// Start a session whose transcript holds only the greeting
    pub fn new(context: SessionContext, greeting: impl Into<String>, backend: B) -> Self {
        let (state, _rx) = watch::channel(SubmitState::Idle);
        Self {
            context,
            state,
            store: TranscriptStore::new(Transcript::seeded(greeting)),
            backend,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.context.session_id
    }

    #[allow(dead_code)] // Presentation API
    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    #[allow(dead_code)] // Presentation API
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            session_id: self.context.session_id.clone(),
            busy: self.is_busy(),
        }
    }

    pub fn transcript(&self) -> Transcript {
        self.store.snapshot()
    }

    pub fn subscribe_transcript(&self) -> watch::Receiver<Transcript> {
        self.store.subscribe()
    }

    #[allow(dead_code)] // For state-driven front ends; the REPL polls instead
    pub fn subscribe_state(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Submit user input.
    ///
    /// Rejected input (blank, or another submission in flight) changes
    /// nothing. Accepted input always settles: the returned state is
    /// `Resolved` or `Failed`, and the gate is back to `Idle` by the time
    /// this returns.
    pub async fn submit(&self, text: &str) -> Result<SubmitState, TransitionError> {
        let effects = match self.apply(Event::Submit {
            text: text.to_string(),
        }) {
            Ok(effects) => effects,
            Err(e) => {
                tracing::debug!(session_id = %self.context.session_id, error = %e, "Submission rejected");
                return Err(e);
            }
        };
        let _finalize = FinalizeGuard { state: &self.state };

        tracing::info!(session_id = %self.context.session_id, "Submission accepted");

        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let Some(event) = self.execute_effect(effect).await else {
                continue;
            };
            match self.apply(event) {
                Ok(effects) => queue.extend(effects),
                Err(e) => {
                    tracing::error!(session_id = %self.context.session_id, error = %e, "Settlement rejected");
                }
            }
        }

        let settled = self.state.borrow().clone();
        tracing::debug!(session_id = %self.context.session_id, state = settled.name(), "Submission settled");
        Ok(settled)
    }

    /// Ranked chunks for a query; a blank query never reaches the backend
    pub async fn retrieve(&self, query: &str, k: u32) -> Result<Vec<RetrievedChunk>, BackendError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.backend.retrieve(&RetrieveRequest::new(query, k)).await
    }

    pub async fn health(&self) -> Result<(), BackendError> {
        self.backend.health().await
    }

    /// Run one transition against the gate; the state only changes on success
    fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let mut outcome = Ok(Vec::new());
        self.state.send_if_modified(|state| match transition(state, event) {
            Ok(result) => {
                *state = result.new_state;
                outcome = Ok(result.effects);
                true
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }

    async fn execute_effect(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendOptimistic { record } | Effect::AppendAssistant { record } => {
                self.store.append(record);
                None
            }

            Effect::Reconcile { user, assistant } => {
                self.store.replace_last_n(1, vec![user, assistant]);
                None
            }

            Effect::SendConversation => {
                let snapshot = self.store.snapshot();
                let request = ChatRequest::new(
                    self.context.session_id.clone(),
                    snapshot.records(),
                    self.context.mode.clone(),
                );

                let event = match self.backend.send_conversation(&request).await {
                    Ok(response) => {
                        if let Err(e) = response.reply_text() {
                            tracing::warn!(
                                session_id = %self.context.session_id,
                                error = %e,
                                "Using fallback reply text"
                            );
                        }
                        Event::ReplyReceived { response }
                    }
                    Err(error) => Event::RequestFailed { error },
                };
                Some(event)
            }
        }
    }
}

/// Releases the busy gate when a submission ends, however it ends
struct FinalizeGuard<'a> {
    state: &'a watch::Sender<SubmitState>,
}

impl Drop for FinalizeGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| {
            if let Ok(result) = transition(state, Event::Finalize) {
                *state = result.new_state;
            }
        });
    }
}
