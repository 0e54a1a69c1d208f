//! Display projection of citations
//!
//! Stored citations are never deduplicated; the presentation layer asks for
//! this view on read.

use crate::transcript::{Citation, MessageRecord};
use std::collections::HashSet;

/// Labels of distinct sources in first-occurrence order.
///
/// When the same `source_id` shows up with different titles the first one wins.
/// Citations without a source id are never merged.
pub fn display_labels(citations: &[Citation]) -> Vec<&str> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter(|citation| {
            let id = citation.source_id.as_str();
            id.trim().is_empty() || seen.insert(id)
        })
        .map(Citation::label)
        .collect()
}

impl MessageRecord {
    pub fn display_citations(&self) -> Vec<&str> {
        display_labels(&self.citations)
    }
}
