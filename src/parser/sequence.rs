//! Speech sequence bodies
//!
//! A speech sequence passage lists its lines as segments separated by `---`.
//! Each segment carries three labeled fields:
//!
//! ```text
//! ``Speaker:`` //Bob//
//! ``Text:`` //Hello there//
//! ``EdgeText:`` //Continue//
//! ```

use crate::config::CompileConfig;
use crate::parser::edge::owner_context;
use crate::parser::text::{clean_text, text_before_edges};
use crate::types::diagnostic::Diagnostics;
use crate::types::node::{InnerStep, NodeIndex};
use regex::Regex;
use std::sync::LazyLock;

/// Separator between two steps of a sequence
pub const STEP_DELIMITER: &str = "---";

fn field_pattern(label: &str) -> Regex {
    // Labels are constant identifiers, so the pattern is always valid
    Regex::new(&format!(r"(?is)``\s*{label}\s*:\s*``\s*//(.*?)//")).expect("sequence field pattern")
}

static SPEAKER_FIELD: LazyLock<Regex> = LazyLock::new(|| field_pattern("Speaker"));
static TEXT_FIELD: LazyLock<Regex> = LazyLock::new(|| field_pattern("Text"));
static EDGE_TEXT_FIELD: LazyLock<Regex> = LazyLock::new(|| field_pattern("EdgeText"));

fn extract_field<'a>(
    pattern: &Regex,
    label: &str,
    segment: &'a str,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a str> {
    let mut captures = pattern.captures_iter(segment);
    let Some(first) = captures.next() else {
        diagnostics.warn(
            context,
            format!("could not get group 1 that matches ``{label}:`` //<value>//"),
        );
        return None;
    };
    if captures.next().is_some() {
        diagnostics.warn(context, format!("got multiple matches for {label}"));
    }

    first.get(1).map(|m| m.as_str())
}

/// Parse a single `---` segment into a step. Incomplete steps are `None`.
pub fn parse_step(
    segment: &str,
    owner: Option<NodeIndex>,
    config: &CompileConfig,
    diagnostics: &mut Diagnostics,
) -> Option<InnerStep> {
    let context = format!("Speech sequence {}", owner_context(owner));
    let speaker = extract_field(&SPEAKER_FIELD, "Speaker", segment, &context, diagnostics);
    let text = extract_field(&TEXT_FIELD, "Text", segment, &context, diagnostics);
    let edge_text = extract_field(&EDGE_TEXT_FIELD, "EdgeText", segment, &context, diagnostics);

    match (speaker, text, edge_text) {
        (Some(speaker), Some(text), Some(edge_text)) => Some(InnerStep {
            speaker: speaker.trim().to_string(),
            text: clean_text(text, config.line_ending),
            edge_text: edge_text.trim().to_string(),
        }),
        _ => {
            diagnostics.warn(&context, "inner step is missing a field, ignoring");
            None
        }
    }
}

/// Parse the steps of a speech sequence body. Links and everything after
/// them are not part of the sequence.
pub fn parse_sequence(
    body: &str,
    owner: Option<NodeIndex>,
    config: &CompileConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<InnerStep> {
    let segments: Vec<&str> = text_before_edges(body)
        .trim()
        .split(STEP_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        diagnostics.warn(
            owner_context(owner),
            "is a speech sequence node but does not have inner edges",
        );
        return Vec::new();
    }

    segments
        .into_iter()
        .filter_map(|segment| parse_step(segment, owner, config, diagnostics))
        .collect()
}
