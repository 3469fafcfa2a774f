//! Typed dialogue nodes, edges and the tag vocabulary that classifies them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside a dialogue graph
pub type NodeIndex = i32;

/// Index of the synthetic start node. Anything below it is invalid.
pub const ROOT_NODE_INDEX: NodeIndex = -1;

/// Returns true if `index` can appear in a compiled graph
pub fn is_valid_index(index: NodeIndex) -> bool {
    index >= ROOT_NODE_INDEX
}

/// Role tag attached to a passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Start,
    End,
    VirtualParent,
    Speech,
    SpeechSequence,
    SelectorFirst,
    SelectorRandom,
}

impl NodeTag {
    pub const ALL: [NodeTag; 7] = [
        NodeTag::Start,
        NodeTag::End,
        NodeTag::VirtualParent,
        NodeTag::Speech,
        NodeTag::SpeechSequence,
        NodeTag::SelectorFirst,
        NodeTag::SelectorRandom,
    ];

    /// Parse a single tag. Accepts both the `node-speech` and the bare `speech` spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        let role = lowered.strip_prefix("node-").unwrap_or(&lowered);
        match role {
            "start" => Some(NodeTag::Start),
            "end" => Some(NodeTag::End),
            "virtual-parent" => Some(NodeTag::VirtualParent),
            "speech" => Some(NodeTag::Speech),
            "speech-sequence" => Some(NodeTag::SpeechSequence),
            "selector-first" => Some(NodeTag::SelectorFirst),
            "selector-random" => Some(NodeTag::SelectorRandom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeTag::Start => "node-start",
            NodeTag::End => "node-end",
            NodeTag::VirtualParent => "node-virtual-parent",
            NodeTag::Speech => "node-speech",
            NodeTag::SpeechSequence => "node-speech-sequence",
            NodeTag::SelectorFirst => "node-selector-first",
            NodeTag::SelectorRandom => "node-selector-random",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recognized tags carried by one passage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSet(u8);

impl TagSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Build a set from a raw, whitespace-separated tag string.
    /// Unrecognized tags are skipped.
    pub fn parse(raw: &str) -> Self {
        raw.split_whitespace().filter_map(NodeTag::parse).collect()
    }

    pub fn insert(&mut self, tag: NodeTag) {
        self.0 |= tag.bit();
    }

    pub fn contains(&self, tag: NodeTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeTag> + '_ {
        NodeTag::ALL.into_iter().filter(|tag| self.contains(*tag))
    }

    /// Speech, virtual parent and start nodes carry a body text
    pub fn can_have_text(&self) -> bool {
        self.contains(NodeTag::Speech)
            || self.contains(NodeTag::VirtualParent)
            || self.contains(NodeTag::Start)
    }

    /// Only these nodes have edges whose text matters
    pub fn can_have_edges(&self) -> bool {
        self.contains(NodeTag::Start)
            || self.contains(NodeTag::Speech)
            || self.contains(NodeTag::SpeechSequence)
    }

    pub fn is_speech_sequence(&self) -> bool {
        self.contains(NodeTag::SpeechSequence)
    }
}

impl FromIterator<NodeTag> for TagSet {
    fn from_iter<I: IntoIterator<Item = NodeTag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.iter().map(|tag| tag.as_str()).collect();
        write!(f, "[{}]", tags.join(", "))
    }
}

/// How a node ends up in the compiled document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Goes to `SpeechSequenceNodes`. Wins over every other tag.
    SpeechSequence,
    /// Goes to `SpeechNodes` (speech, virtual parent or start)
    Speech,
    /// Structural or untagged node, never emitted
    Excluded,
}

impl NodeKind {
    pub fn classify(tags: &TagSet) -> Self {
        if tags.contains(NodeTag::SpeechSequence) {
            NodeKind::SpeechSequence
        } else if tags.contains(NodeTag::Speech)
            || tags.contains(NodeTag::VirtualParent)
            || tags.contains(NodeTag::Start)
        {
            NodeKind::Speech
        } else {
            NodeKind::Excluded
        }
    }
}

/// Directed link to another node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Edge {
    pub target_node_index: NodeIndex,
    /// Display text, empty when the link asked for no text
    pub text: String,
}

/// One line of a speech sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InnerStep {
    pub speaker: String,
    pub text: String,
    pub edge_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechNode {
    pub node_index: NodeIndex,
    pub speaker: Option<String>,
    pub text: String,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SequenceNode {
    pub node_index: NodeIndex,
    pub speaker: Option<String>,
    #[serde(rename = "Sequence")]
    pub steps: Vec<InnerStep>,
    pub edges: Vec<Edge>,
}

/// A finalized node, ready for a document bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Speech(SpeechNode),
    Sequence(SequenceNode),
}

impl Node {
    pub fn index(&self) -> NodeIndex {
        match self {
            Node::Speech(node) => node.node_index,
            Node::Sequence(node) => node.node_index,
        }
    }
}
