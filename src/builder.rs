//! Document assembly
//!
//! The builder collects document metadata and parsed nodes as the compiler
//! encounters them. Id normalization and node parsing fail independently:
//! a bad ifid leaves every parsed node in place.

use crate::error::CompileError;
use crate::parser::ParsedNode;
use crate::types::diagnostic::Diagnostics;
use crate::types::document::{DialogueGuid, Document};
use crate::types::node::Node;

const CONTEXT: &str = "Dialogue";

#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    name: Option<String>,
    raw_guid: Option<String>,
    guid: Option<DialogueGuid>,
    nodes: Vec<ParsedNode>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_raw_guid(&mut self, raw_guid: impl Into<String>) {
        self.raw_guid = Some(raw_guid.into());
        self.guid = None;
    }

    pub fn push_node(&mut self, node: ParsedNode) {
        self.nodes.push(node);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn raw_guid(&self) -> Option<&str> {
        self.raw_guid.as_deref()
    }

    pub fn guid(&self) -> Option<&DialogueGuid> {
        self.guid.as_ref()
    }

    /// Every parsed node, in encounter order, including excluded ones
    pub fn nodes(&self) -> &[ParsedNode] {
        &self.nodes
    }

    /// Normalize the raw ifid. Fails for this document only.
    pub fn parse_guid(&mut self) -> Result<&DialogueGuid, CompileError> {
        let raw = self.raw_guid.as_deref().ok_or(CompileError::MissingGuid)?;
        let guid = DialogueGuid::parse(raw).map_err(|source| CompileError::InvalidGuid {
            raw: raw.to_string(),
            source,
        })?;
        Ok(self.guid.insert(guid))
    }

    /// Produce the document, or `None` if it is invalid and nothing should be written
    pub fn finalize(&self, diagnostics: &mut Diagnostics) -> Option<Document> {
        let mut speech_nodes = Vec::new();
        let mut speech_sequence_nodes = Vec::new();
        for parsed in &self.nodes {
            match parsed.to_node(diagnostics) {
                Some(Node::Sequence(node)) => speech_sequence_nodes.push(node),
                Some(Node::Speech(node)) => speech_nodes.push(node),
                None => {}
            }
        }

        let name = self.name.as_deref().filter(|name| !name.is_empty());
        if name.is_none() {
            diagnostics.warn(CONTEXT, "has no name");
        }
        if self.guid.is_none() {
            diagnostics.warn(CONTEXT, "has no valid ifid");
        }
        if speech_nodes.is_empty() && speech_sequence_nodes.is_empty() {
            diagnostics.warn(CONTEXT, "does not have any nodes");
        }

        match (name, &self.guid) {
            (Some(name), Some(guid)) if !(speech_nodes.is_empty() && speech_sequence_nodes.is_empty()) => {
                Some(Document {
                    name: name.to_string(),
                    guid: guid.clone(),
                    speech_nodes,
                    speech_sequence_nodes,
                })
            }
            _ => None,
        }
    }
}
