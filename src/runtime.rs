//! Runtime for driving a chat session
//!
//! The controller owns the transcript store and the busy gate, feeds events
//! through the pure state machine and executes the resulting effects.

mod controller;

#[cfg(test)]
pub mod testing;

pub use controller::SessionController;

use crate::backend::{HttpBackend, LoggingBackend};

/// Controller wired to the real HTTP backend
pub type ProductionController = SessionController<LoggingBackend<HttpBackend>>;
