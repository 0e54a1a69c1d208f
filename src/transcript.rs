//! Conversation transcript
//!
//! The transcript is the only thing the presentation layer renders. It has a
//! single writer (the session controller) and any number of readers; readers
//! hold a `watch` receiver and always see a whole snapshot.

mod record;

pub use record::{Citation, MessageRecord, Role};

use tokio::sync::watch;

/// Ordered sequence of message records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    records: Vec<MessageRecord>,
}

impl Transcript {
    /// Start a transcript with the assistant greeting
    pub fn seeded(greeting: impl Into<String>) -> Self {
        Self {
            records: vec![MessageRecord::assistant(greeting)],
        }
    }

    pub fn append(&mut self, record: MessageRecord) {
        self.records.push(record);
    }

    /// Remove the last `n` records and append `records` in order.
    /// Removing more records than exist empties the transcript first.
    pub fn replace_last_n(&mut self, n: usize, records: impl IntoIterator<Item = MessageRecord>) {
        let keep = self.records.len().saturating_sub(n);
        self.records.truncate(keep);
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)] // Reader API
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[allow(dead_code)] // Reader API
    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Single-writer store publishing transcript snapshots
pub struct TranscriptStore {
    tx: watch::Sender<Transcript>,
}

impl TranscriptStore {
    pub fn new(initial: Transcript) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn append(&self, record: MessageRecord) {
        self.tx.send_modify(|transcript| transcript.append(record));
    }

    /// Atomic from the readers' point of view: one notification, one new snapshot
    pub fn replace_last_n(&self, n: usize, records: Vec<MessageRecord>) {
        self.tx
            .send_modify(|transcript| transcript.replace_last_n(n, records));
    }

    pub fn snapshot(&self) -> Transcript {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.tx.subscribe()
    }
}
