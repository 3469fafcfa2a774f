//! Text normalization shared by every text-bearing parse step

use crate::config::LineEnding;

/// Marker that opens a link in a passage body
pub const EDGE_OPEN: &str = "[[";

/// Trim `text` and rewrite every line break (`\r\n`, `\r`, `\n`) to `line_ending`.
///
/// Applying it twice gives the same result as applying it once.
pub fn clean_text(text: &str, line_ending: LineEnding) -> String {
    let trimmed = text.trim();
    let newline = line_ending.as_str();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(newline);
            }
            '\n' => out.push_str(newline),
            c => out.push(c),
        }
    }

    out
}

/// The part of a passage body that precedes its first link
pub fn text_before_edges(body: &str) -> &str {
    match body.find(EDGE_OPEN) {
        Some(end) => &body[..end],
        None => body,
    }
}
