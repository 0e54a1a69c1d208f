//! Submission state machine
//!
//! Pure state transitions in the Elm style: the controller feeds events in
//! and executes the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{SessionContext, SubmitState};
pub use transition::{transition, TransitionError};
