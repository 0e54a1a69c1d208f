//! Property-based tests for the state machine
//!
//! Events are replayed against a plain `Transcript`, executing effects the
//! same way the controller does, so ordering can be checked end to end.

use super::*;
use crate::backend::{BackendError, ChatResponse};
use crate::transcript::{Role, Transcript};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9 ?§]{1,30}",
        1 => "[ \t\n]{0,4}",
    ]
}

fn arb_response() -> impl Strategy<Value = ChatResponse> {
    (
        proptest::option::of("[a-zA-Z .]{0,20}"),
        proptest::option::of("[a-zA-Z .]{0,20}"),
    )
        .prop_map(|(reply, answer)| ChatResponse {
            reply,
            answer,
            ..ChatResponse::default()
        })
}

fn arb_error() -> impl Strategy<Value = BackendError> {
    prop_oneof![
        (400u16..600).prop_map(|status| BackendError::server(status, None)),
        Just(BackendError::network("unreachable")),
        Just(BackendError::request_construction("bad url")),
    ]
}

fn arb_settlement() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_response().prop_map(|response| Event::ReplyReceived { response }),
        arb_error().prop_map(|error| Event::RequestFailed { error }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_input().prop_map(|text| Event::Submit { text }),
        arb_settlement(),
        Just(Event::Finalize),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

/// Apply effects to a transcript; returns whether a send was requested
fn apply_effects(transcript: &mut Transcript, effects: Vec<Effect>) -> bool {
    let mut sent = false;
    for effect in effects {
        match effect {
            Effect::AppendOptimistic { record } | Effect::AppendAssistant { record } => {
                transcript.append(record);
            }
            Effect::SendConversation => sent = true,
            Effect::Reconcile { user, assistant } => {
                transcript.replace_last_n(1, [user, assistant]);
            }
        }
    }
    sent
}

/// Full accepted cycle the way the controller drives it
fn run_cycle(state: &mut SubmitState, transcript: &mut Transcript, text: String, settlement: Event) -> bool {
    let Ok(result) = transition(state, Event::Submit { text }) else {
        return false;
    };
    *state = result.new_state;
    assert!(apply_effects(transcript, result.effects));

    let result = transition(state, settlement).expect("settlement accepted while submitting");
    *state = result.new_state;
    apply_effects(transcript, result.effects);

    let result = transition(state, Event::Finalize).expect("finalize always accepted");
    *state = result.new_state;
    true
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_busy_iff_not_idle(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = SubmitState::Idle;
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            prop_assert_eq!(state.is_busy(), state != SubmitState::Idle);
        }
    }

    #[test]
    fn prop_rejected_events_have_no_effects(
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let mut state = SubmitState::Idle;
        for event in events {
            let before = state.clone();
            match transition(&state, event) {
                Ok(result) => state = result.new_state,
                Err(_) => prop_assert_eq!(&state, &before),
            }
        }
    }

    #[test]
    fn prop_submit_while_busy_never_sends(
        text in "[a-z]{1,10}",
        pending in "[a-z]{1,10}",
    ) {
        let state = SubmitState::Submitting { pending: crate::transcript::MessageRecord::user(pending) };
        prop_assert_eq!(
            transition(&state, Event::Submit { text }).unwrap_err(),
            TransitionError::Busy
        );
    }

    #[test]
    fn prop_finalize_always_idles(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = SubmitState::Idle;
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }
        let result = transition(&state, Event::Finalize).unwrap();
        prop_assert_eq!(result.new_state, SubmitState::Idle);
    }

    #[test]
    fn prop_accepted_cycles_produce_ordered_pairs(
        cycles in proptest::collection::vec((arb_input(), arb_settlement()), 0..15),
    ) {
        let mut state = SubmitState::Idle;
        let mut transcript = Transcript::seeded("Welcome");
        let mut accepted = Vec::new();

        for (text, settlement) in cycles {
            let trimmed = text.trim().to_string();
            if run_cycle(&mut state, &mut transcript, text, settlement) {
                accepted.push(trimmed);
            }
        }

        prop_assert_eq!(state, SubmitState::Idle);
        prop_assert_eq!(transcript.len(), 1 + 2 * accepted.len());
        prop_assert_eq!(transcript.records()[0].text.as_str(), "Welcome");

        for (i, expected) in accepted.iter().enumerate() {
            let user = &transcript.records()[1 + 2 * i];
            let assistant = &transcript.records()[2 + 2 * i];
            prop_assert_eq!(user.role, Role::User);
            prop_assert_eq!(&user.text, expected);
            prop_assert_eq!(assistant.role, Role::Assistant);
            prop_assert!(!assistant.text.is_empty());
        }
    }
}
