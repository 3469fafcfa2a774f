//! The compiled dialogue document

use crate::types::node::{SequenceNode, SpeechNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Dialogue id rendered as 32 uppercase hex digits with no separators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueGuid(String);

impl DialogueGuid {
    /// Normalize a free-form UUID string (hyphenated, simple, braced or urn)
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(raw.trim())?;
        Ok(Self::from(uuid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for DialogueGuid {
    fn from(uuid: Uuid) -> Self {
        let mut buffer = Uuid::encode_buffer();
        Self(uuid.simple().encode_upper(&mut buffer).to_string())
    }
}

impl fmt::Display for DialogueGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compiled dialogue graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "DialogueName")]
    pub name: String,
    #[serde(rename = "DialogueGuid", alias = "DialogueGUID")]
    pub guid: DialogueGuid,
    #[serde(rename = "SpeechNodes", default)]
    pub speech_nodes: Vec<SpeechNode>,
    #[serde(rename = "SpeechSequenceNodes", default)]
    pub speech_sequence_nodes: Vec<SequenceNode>,
}

impl Document {
    pub fn node_count(&self) -> usize {
        self.speech_nodes.len() + self.speech_sequence_nodes.len()
    }

    /// Render as pretty JSON indented with `indent` spaces
    pub fn to_json(&self, indent: usize) -> serde_json::Result<String> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
