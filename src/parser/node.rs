//! Passage to node parsing

use crate::config::CompileConfig;
use crate::parser::edge::{owner_context, parse_edges};
use crate::parser::name::parse_node_name;
use crate::parser::sequence::parse_sequence;
use crate::parser::text::{clean_text, text_before_edges};
use crate::types::diagnostic::Diagnostics;
use crate::types::node::{
    Edge, InnerStep, Node, NodeIndex, NodeKind, SequenceNode, SpeechNode, TagSet, is_valid_index,
};

/// Passage data as reported by the event source, before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNode {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub body: String,
}

impl RawNode {
    pub fn new(name: impl Into<String>, tags: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tags: Some(tags.into()),
            body: body.into(),
        }
    }

    pub fn push_text(&mut self, data: &str) {
        self.body.push_str(data);
    }

    /// Parse this passage. Problems are recorded in `diagnostics`, never raised.
    pub fn parse(&self, config: &CompileConfig, diagnostics: &mut Diagnostics) -> ParsedNode {
        let raw_tags = self.tags.as_deref().unwrap_or_default();
        let tags = TagSet::parse(raw_tags);

        let raw_name = self.name.as_deref().unwrap_or_default();
        let name = parse_node_name(raw_name, &format!("Node Name = {raw_name}"), diagnostics);
        let index = name.index;

        if tags.is_empty() {
            diagnostics.warn(
                owner_context(index),
                format!("does not have any valid tags = [{}]", raw_tags.trim()),
            );
        }

        let body = self.body.trim();
        let text = tags
            .can_have_text()
            .then(|| clean_text(text_before_edges(body), config.line_ending));
        let edges = if tags.can_have_edges() && !body.is_empty() {
            parse_edges(body, index, config, diagnostics)
        } else {
            Vec::new()
        };
        let steps = if tags.is_speech_sequence() {
            parse_sequence(body, index, config, diagnostics)
        } else {
            Vec::new()
        };

        ParsedNode {
            index,
            speaker: name.speaker,
            kind: NodeKind::classify(&tags),
            tags,
            text,
            edges,
            steps,
        }
    }
}

/// A parsed passage. Every field that may fail to parse is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNode {
    pub index: Option<NodeIndex>,
    pub speaker: Option<String>,
    pub tags: TagSet,
    pub kind: NodeKind,
    pub text: Option<String>,
    pub edges: Vec<Edge>,
    pub steps: Vec<InnerStep>,
}

impl ParsedNode {
    /// Turn into a typed node, or `None` if the node does not belong in a document
    pub fn to_node(&self, diagnostics: &mut Diagnostics) -> Option<Node> {
        let index = match self.index {
            Some(index) if is_valid_index(index) => index,
            _ => {
                diagnostics.warn(owner_context(self.index), "is invalid, ignoring");
                return None;
            }
        };

        match self.kind {
            NodeKind::SpeechSequence => Some(Node::Sequence(SequenceNode {
                node_index: index,
                speaker: self.speaker.clone(),
                steps: self.steps.clone(),
                edges: self.edges.clone(),
            })),
            NodeKind::Speech => Some(Node::Speech(SpeechNode {
                node_index: index,
                speaker: self.speaker.clone(),
                text: self.text.clone().unwrap_or_default(),
                edges: self.edges.clone(),
            })),
            NodeKind::Excluded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::node::NodeTag;

    fn parse(name: &str, tags: &str, body: &str) -> (ParsedNode, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let node = RawNode::new(name, tags, body).parse(&CompileConfig::default(), &mut diagnostics);
        (node, diagnostics)
    }

    #[test]
    fn speech_node_gets_text_and_edges() {
        let (node, diagnostics) = parse(
            "3. Guard",
            "node-speech",
            "Who are you?\nSpeak!\n[[A friend|4. Player]]\n[[~ignore~|5. Player]]",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(node.kind, NodeKind::Speech);
        assert_eq!(node.text.as_deref(), Some("Who are you?\r\nSpeak!"));
        assert_eq!(node.edges.len(), 2);
        assert_eq!(node.edges[1].text, "");
    }

    #[test]
    fn end_node_has_no_text_or_edges() {
        let (node, _) = parse("9. Guard", "node-end", "Bye [[Again|1. Guard]]");
        assert_eq!(node.kind, NodeKind::Excluded);
        assert_eq!(node.text, None);
        assert!(node.edges.is_empty());

        let mut diagnostics = Diagnostics::new();
        assert_eq!(node.to_node(&mut diagnostics), None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn untagged_node_is_parsed_but_excluded() {
        let (node, diagnostics) = parse("2. Bob", "nobr", "Hello");
        assert_eq!(node.index, Some(2));
        assert_eq!(node.kind, NodeKind::Excluded);
        assert!(diagnostics.mentions("does not have any valid tags"));
    }

    #[test]
    fn missing_tags_attribute_is_treated_as_empty() {
        let raw = RawNode {
            name: Some("1. Bob".to_string()),
            tags: None,
            body: "Hi".to_string(),
        };
        let mut diagnostics = Diagnostics::new();
        let node = raw.parse(&CompileConfig::default(), &mut diagnostics);
        assert!(node.tags.is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn virtual_parent_has_text_but_no_edges() {
        let (node, _) = parse("6. Narrator", "node-virtual-parent", "Meanwhile [[x|7. A]]");
        assert_eq!(node.text.as_deref(), Some("Meanwhile"));
        assert!(node.edges.is_empty());
        assert!(matches!(
            node.to_node(&mut Diagnostics::new()),
            Some(Node::Speech(SpeechNode { node_index: 6, .. }))
        ));
    }

    #[test]
    fn speech_sequence_wins_over_speech() {
        let (node, _) = parse(
            "8. Crowd",
            "node-speech node-speech-sequence",
            "``Speaker:`` //A// ``Text:`` //B// ``EdgeText:`` //C// [[Done|9. End]]",
        );
        assert!(node.tags.contains(NodeTag::Speech));
        let Some(Node::Sequence(sequence)) = node.to_node(&mut Diagnostics::new()) else {
            panic!("Expected sequence node");
        };
        assert_eq!(sequence.steps.len(), 1);
        assert_eq!(sequence.edges.len(), 1);
        assert_eq!(sequence.speaker.as_deref(), Some("Crowd"));
    }

    #[test]
    fn invalid_index_is_excluded_with_warning() {
        let (node, _) = parse("-5. Ghost", "node-speech", "Boo");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(node.to_node(&mut diagnostics), None);
        assert!(diagnostics.mentions("is invalid"));

        let (node, _) = parse("Ghost", "node-speech", "Boo");
        assert_eq!(node.index, None);
        assert_eq!(node.to_node(&mut Diagnostics::new()), None);
    }
}
