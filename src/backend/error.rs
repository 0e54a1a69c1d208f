//! Backend error types

use serde_json::Value;
use thiserror::Error;

/// Backend call failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
    /// HTTP status, only for `Server`
    pub status: Option<u16>,
    /// Whatever body the backend returned alongside a failure status
    pub body: Option<Value>,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn server(status: u16, body: Option<Value>) -> Self {
        let detail = body
            .as_ref()
            .and_then(|b| b.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = match detail {
            Some(detail) => format!("HTTP {status}: {detail}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: BackendErrorKind::Server,
            message,
            status: Some(status),
            body,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    pub fn request_construction(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::RequestConstruction, message)
    }

    /// Fixed text shown in the transcript for this failure
    pub fn user_message(&self) -> String {
        self.kind.user_message(self.status)
    }
}

/// How an outbound call settled when it did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// A response arrived with a non-success status
    Server,
    /// The request went out but nothing came back
    Network,
    /// The request could not be issued at all
    RequestConstruction,
}

impl BackendErrorKind {
    pub fn user_message(self, status: Option<u16>) -> String {
        match (self, status) {
            (Self::Server, Some(status)) => {
                format!("The backend returned an error (HTTP {status}). Please try again.")
            }
            (Self::Server, None) => "The backend returned an error. Please try again.".to_string(),
            (Self::Network, _) => {
                "No response from the backend. Check that the server is running.".to_string()
            }
            (Self::RequestConstruction, _) => {
                "Could not send the request. Please try again.".to_string()
            }
        }
    }
}

/// The backend answered but carried no usable reply text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("backend reply had neither `reply` nor `answer` text")]
pub struct EmptyReply;
