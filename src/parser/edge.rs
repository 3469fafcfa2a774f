//! Links of the form `[[<display text>|<index>. <label>]]`

use crate::config::CompileConfig;
use crate::parser::name::parse_node_index;
use crate::parser::text::clean_text;
use crate::types::diagnostic::Diagnostics;
use crate::types::node::{Edge, NodeIndex, is_valid_index};
use regex::Regex;
use std::sync::LazyLock;

static EDGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, known to be valid
    Regex::new(r"\[\[(.*?)\]\]").expect("edge link pattern")
});

pub(crate) fn owner_context(owner: Option<NodeIndex>) -> String {
    match owner {
        Some(index) => format!("Node Index = {index}"),
        None => "Node Index = None".to_string(),
    }
}

/// Parse the body of one link (without the brackets).
///
/// Returns `None` for a malformed or invalid edge, after recording why.
pub fn parse_edge(
    raw: &str,
    owner: Option<NodeIndex>,
    config: &CompileConfig,
    diagnostics: &mut Diagnostics,
) -> Option<Edge> {
    let context = owner_context(owner);
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('|').collect();
    let [raw_text, raw_target] = parts.as_slice() else {
        diagnostics.warn(
            &context,
            format!(
                "has an edge `{raw}` with {} parts. There must be exactly 2. Did you use `|` inside your edge?",
                parts.len()
            ),
        );
        return None;
    };

    let text = if raw_text.trim().is_empty() || config.is_empty_edge_marker(raw_text) {
        String::new()
    } else {
        clean_text(raw_text, config.line_ending)
    };

    let target_context = format!("{context} Edge, target = `{raw_target}`");
    let Some(target_node_index) = parse_node_index(raw_target, &target_context, diagnostics) else {
        diagnostics.warn(&context, format!("edge `{raw}` has no target node index, ignoring"));
        return None;
    };
    if !is_valid_index(target_node_index) {
        diagnostics.warn(
            &context,
            format!("edge `{raw}` targets invalid node index {target_node_index}, ignoring"),
        );
        return None;
    }

    Some(Edge {
        target_node_index,
        text,
    })
}

/// Parse every link in a passage body, in order. Invalid links are skipped.
pub fn parse_edges(
    body: &str,
    owner: Option<NodeIndex>,
    config: &CompileConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<Edge> {
    EDGE_LINK
        .captures_iter(body)
        .filter_map(|captures| {
            let inner = captures.get(1)?.as_str();
            parse_edge(inner, owner, config, diagnostics)
        })
        .collect()
}

/// Number of link brackets in a body
#[cfg(test)]
pub(crate) fn count_edge_links(body: &str) -> usize {
    EDGE_LINK.find_iter(body).count()
}
