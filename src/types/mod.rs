//! Core types for the twinegraph library
//!
//! - Node: passage tags, edges, inner steps and the typed nodes of a graph
//! - Document: the compiled dialogue and its normalized id
//! - Diagnostic: warnings and errors collected while compiling

pub mod diagnostic;
pub mod document;
pub mod node;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use document::{DialogueGuid, Document};
pub use node::{
    Edge, InnerStep, Node, NodeIndex, NodeKind, NodeTag, ROOT_NODE_INDEX, SequenceNode, SpeechNode,
    TagSet,
};
