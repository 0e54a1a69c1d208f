//! Normalization of backend replies
//!
//! The reply contract has drifted over time (`reply` vs `answer`), so every
//! body goes through one tolerant adapter before the engine looks at it.

use super::error::EmptyReply;
use super::types::ChatResponse;
use crate::transcript::Citation;
use serde_json::Value;

/// Shown when the backend answered without any reply text
pub const FALLBACK_REPLY: &str = "No reply from backend.";

impl ChatResponse {
    /// Accept any JSON body. Fields of the wrong type are ignored rather than
    /// failing the whole reply.
    pub fn from_value(value: &Value) -> Self {
        let text_field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        let citations = value
            .get("citations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value::<Citation>(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let debug = value.get("debug").filter(|d| !d.is_null()).cloned();

        Self {
            reply: text_field("reply"),
            answer: text_field("answer"),
            citations,
            debug,
        }
    }

    /// Reply text by preference: `reply`, then `answer`. Candidates that are
    /// empty once sanitized are skipped.
    pub fn reply_text(&self) -> Result<String, EmptyReply> {
        [self.reply.as_deref(), self.answer.as_deref()]
            .into_iter()
            .flatten()
            .map(sanitize)
            .find(|text| !text.is_empty())
            .ok_or(EmptyReply)
    }
}

fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{061C}'                 // Arabic letter mark
                | '\u{200B}'..='\u{200F}' // zero-width space/joiners, LRM, RLM
                | '\u{2028}'..='\u{202E}' // line/paragraph separators, bidi embeddings
                | '\u{2060}'..='\u{2064}' // word joiner, invisible operators
                | '\u{2066}'..='\u{2069}' // bidi isolates
                | '\u{FEFF}'              // BOM
        )
}

/// Strip control, zero-width, directional and BOM characters, then trim.
pub fn sanitize(text: &str) -> String {
    let stripped: String = text.chars().filter(|&c| !is_invisible(c)).collect();
    stripped.trim().to_string()
}
