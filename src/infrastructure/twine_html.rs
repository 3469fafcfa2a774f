//! Twine HTML event source
//!
//! Twine 2 publishes a story as a single HTML page with one `<tw-storydata>`
//! element holding every `<tw-passagedata>`. Only that element is tokenized;
//! the surrounding page (story format scripts, void tags, unquoted
//! attributes) is not well-formed markup and is skipped.

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use regex::{Captures, Regex};

use crate::compiler::{CONTAINER_ELEMENT, EventHandler, EventSource};
use crate::error::CompileError;

/// Elements whose content is raw text in HTML, never markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

static CHARACTER_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, known to be valid
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").expect("reference pattern")
});

/// Event source over a published Twine HTML page
#[derive(Debug, Clone, Copy)]
pub struct TwineHtmlSource<'a> {
    html: &'a str,
}

impl<'a> TwineHtmlSource<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html }
    }

    /// The `<tw-storydata>` element and its offset in the page.
    /// Falls back to the whole page if there is none.
    fn story_slice(&self) -> (usize, &'a str) {
        // ASCII lowercasing keeps byte offsets intact
        let lowered = self.html.to_ascii_lowercase();
        let Some(start) = lowered.find(&format!("<{CONTAINER_ELEMENT}")) else {
            return (0, self.html);
        };
        let closing = format!("</{CONTAINER_ELEMENT}>");
        let end = lowered
            .rfind(&closing)
            .filter(|end| *end >= start)
            .map(|end| end + closing.len())
            .unwrap_or(self.html.len());
        (start, &self.html[start..end])
    }
}

/// Blank out the content of `<script>` and `<style>` elements. Their content
/// is code, so `<` in it must not be read as markup. Byte offsets are kept.
fn mask_raw_text(markup: &str) -> Cow<'_, str> {
    let lowered = markup.to_ascii_lowercase();
    let mut masked = String::new();
    let mut copied = 0;
    let mut cursor = 0;

    while let Some((element, content_start)) = next_raw_text_element(&lowered, cursor) {
        let closing = format!("</{element}");
        let content_end = lowered[content_start..]
            .find(&closing)
            .map(|offset| content_start + offset)
            .unwrap_or(markup.len());

        masked.push_str(&markup[copied..content_start]);
        masked.extend(std::iter::repeat_n(' ', content_end - content_start));
        copied = content_end;
        cursor = content_end;
    }

    if copied == 0 {
        return Cow::Borrowed(markup);
    }
    masked.push_str(&markup[copied..]);
    Cow::Owned(masked)
}

/// The next raw text element at or after `from`, and where its content starts
fn next_raw_text_element(lowered: &str, from: usize) -> Option<(&'static str, usize)> {
    RAW_TEXT_ELEMENTS
        .iter()
        .filter_map(|element| {
            let pattern = format!("<{element}");
            let mut search = from;
            while let Some(offset) = lowered[search..].find(&pattern) {
                let tag_start = search + offset;
                let after_name = tag_start + pattern.len();
                let boundary = lowered[after_name..].chars().next();
                if matches!(boundary, Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace()) {
                    let tag_end = lowered[after_name..].find('>')? + after_name;
                    // `<script/>` has no content
                    if lowered[..tag_end].ends_with('/') {
                        search = tag_end;
                        continue;
                    }
                    return Some((tag_start, *element, tag_end + 1));
                }
                search = after_name;
            }
            None
        })
        .min_by_key(|(tag_start, _, _)| *tag_start)
        .map(|(_, element, content_start)| (element, content_start))
}

/// Resolve every HTML5 character reference. A reference that does not
/// resolve is kept as written; the rest of the text is still decoded.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if let Ok(text) = unescape_with(raw, resolve_html5_entity) {
        return text;
    }

    CHARACTER_REFERENCE.replace_all(raw, |captures: &Captures<'_>| {
        let reference = &captures[0];
        match unescape_with(reference, resolve_html5_entity) {
            Ok(text) => text.into_owned(),
            Err(_) => reference.to_string(),
        }
    })
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Attributes with lowercased keys. Valueless attributes such as `hidden` are kept
/// with an empty value.
fn html_attributes(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .html_attributes()
        .filter_map(Result::ok)
        .map(|attribute| {
            let key = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase();
            let value = decode_entities(&String::from_utf8_lossy(&attribute.value)).into_owned();
            (key, value)
        })
        .collect()
}

impl EventSource for TwineHtmlSource<'_> {
    fn drive(&self, handler: &mut dyn EventHandler) -> Result<(), CompileError> {
        let (offset, story) = self.story_slice();
        let story = mask_raw_text(story);
        let mut reader = Reader::from_str(&story);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        loop {
            let event = reader.read_event().map_err(|e| {
                CompileError::markup(offset as u64 + reader.buffer_position() as u64, e.to_string())
            })?;

            match event {
                Event::Start(start) => {
                    handler.start_element(&element_name(&start), &html_attributes(&start));
                }
                Event::Empty(start) => {
                    let name = element_name(&start);
                    handler.start_element(&name, &html_attributes(&start));
                    handler.end_element(&name);
                }
                Event::End(end) => {
                    handler.end_element(&String::from_utf8_lossy(end.name().as_ref()));
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text);
                    handler.text(&decode_entities(&raw));
                }
                Event::CData(data) => {
                    handler.text(&String::from_utf8_lossy(&data));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(())
    }
}
