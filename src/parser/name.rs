//! The `<index>. <speaker>` naming convention of passages

use crate::types::diagnostic::Diagnostics;
use crate::types::node::NodeIndex;
use regex::Regex;
use std::sync::LazyLock;

static NODE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, known to be valid
    Regex::new(r"(?m)^\s*(-?\d+)\.\s*(.*?)\s*$").expect("node name pattern")
});

/// Index and speaker resolved from a passage name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeName {
    pub index: Option<NodeIndex>,
    pub speaker: Option<String>,
}

struct NameMatch<'a> {
    index: Option<&'a str>,
    speaker: Option<&'a str>,
}

fn match_name<'a>(raw: &'a str, context: &str, diagnostics: &mut Diagnostics) -> Option<NameMatch<'a>> {
    let mut captures = NODE_NAME.captures_iter(raw);
    let first = captures.next()?;
    if captures.next().is_some() {
        diagnostics.warn(context, "got multiple name matches, using the first one");
    }

    Some(NameMatch {
        index: first.get(1).map(|m| m.as_str()),
        speaker: first.get(2).map(|m| m.as_str()),
    })
}

fn resolve_index(group: Option<&str>, context: &str, diagnostics: &mut Diagnostics) -> Option<NodeIndex> {
    let index = group.and_then(|digits| digits.trim().parse::<NodeIndex>().ok());
    if index.is_none() {
        diagnostics.warn(
            context,
            "could not get node index from <node index>. <Speaker>",
        );
    }
    index
}

/// Parse a passage name. Never fails: missing parts are `None` plus a warning.
pub fn parse_node_name(raw: &str, context: &str, diagnostics: &mut Diagnostics) -> NodeName {
    let Some(found) = match_name(raw, context, diagnostics) else {
        diagnostics.warn(
            context,
            "could not get node index from <node index>. <Speaker>",
        );
        diagnostics.warn(context, "could not get speaker from <node index>. <Speaker>");
        return NodeName::default();
    };

    let index = resolve_index(found.index, context, diagnostics);
    let speaker = found
        .speaker
        .map(str::trim)
        .filter(|speaker| !speaker.is_empty())
        .map(str::to_string);
    if speaker.is_none() {
        diagnostics.warn(context, "could not get speaker from <node index>. <Speaker>");
    }

    NodeName { index, speaker }
}

/// Parse only the index part of a name, as used by edge targets
pub fn parse_node_index(raw: &str, context: &str, diagnostics: &mut Diagnostics) -> Option<NodeIndex> {
    match match_name(raw, context, diagnostics) {
        Some(found) => resolve_index(found.index, context, diagnostics),
        None => resolve_index(None, context, diagnostics),
    }
}
