//! Line-oriented presentation layer
//!
//! Parses what the user typed and renders transcript records as text.

use crate::backend::RetrievedChunk;
use crate::transcript::{MessageRecord, Role};
use std::fmt::Write as _;

/// Maximum excerpt length shown for retrieved chunks
const EXCERPT_CHARS: usize = 160;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text to send to the assistant
    Message(String),
    Retrieve(String),
    Health,
    Transcript,
    Debug,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Message(line.to_string());
        };

        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name {
            "retrieve" | "r" => Command::Retrieve(arg.trim().to_string()),
            "health" => Command::Health,
            "transcript" | "t" => Command::Transcript,
            "debug" => Command::Debug,
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "h" | "?" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type a question and press enter.
  /retrieve <query>  show the top matching chunks
  /health            check the backend
  /transcript        print the whole conversation
  /debug             show debug info of the last answer
  /quit              leave";

/// Render one record, with deduplicated sources under assistant turns
pub fn render_record(record: &MessageRecord) -> String {
    let speaker = match record.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{speaker}> {}", record.text);

    let sources = record.display_citations();
    if !sources.is_empty() {
        let _ = write!(out, "\n  sources: {}", sources.join("; "));
    }
    out
}

pub fn render_chunk(rank: usize, chunk: &RetrievedChunk) -> String {
    let title = chunk
        .title
        .as_deref()
        .or(chunk.source_id.as_deref())
        .unwrap_or("untitled");
    let score = chunk.score.map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));

    let mut out = format!("{rank}. [{score}] {title}");
    if let Some(index) = chunk.chunk_index {
        let _ = write!(out, " #{index}");
    }
    if let Some(path) = chunk.path.as_deref() {
        let _ = write!(out, " ({path})");
    }
    if let Some(excerpt) = chunk.excerpt.as_deref() {
        let excerpt: String = excerpt.chars().take(EXCERPT_CHARS).collect();
        let _ = write!(out, "\n   {}", excerpt.replace('\n', " "));
    }
    out
}
