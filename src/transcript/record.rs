//! Message records held in the transcript

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Who authored a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Backend-supplied pointer to a source document or chunk group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(alias = "sourceId", default, deserialize_with = "null_as_empty")]
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Fields the engine does not interpret (`chunk_index`, `excerpt`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Citation {
    #[allow(dead_code)] // Constructor for API completeness
    pub fn new(source_id: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Title to show, falling back to the source id when the title is missing or blank
    pub fn label(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.source_id,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub role: Role,
    /// Older producers named this field `content`
    #[serde(alias = "content", default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<Value>,
}

impl MessageRecord {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            citations: Vec::new(),
            debug_info: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            citations: Vec::new(),
            debug_info: None,
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_debug_info(mut self, debug_info: Option<Value>) -> Self {
        self.debug_info = debug_info;
        self
    }
}
