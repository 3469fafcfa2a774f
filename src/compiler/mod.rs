//! Story compiler
//!
//! The compiler is driven by an [`EventSource`] that pushes element and text
//! events in document order. It keeps one passage cursor at a time:
//!
//! ```text
//! Idle --<tw-storydata>--> InContainer --<tw-passagedata>--> InPassage
//!   ^                          |   ^                              |
//!   +------</tw-storydata>-----+   +------</tw-passagedata>-------+
//! ```
//!
//! Passages are parsed as soon as they end; the ifid is normalized when the
//! container ends. Nothing survives a single [`GraphCompiler::compile`] call.

use crate::builder::DocumentBuilder;
use crate::config::CompileConfig;
use crate::error::CompileError;
use crate::infrastructure::twine_html::TwineHtmlSource;
use crate::parser::RawNode;
use crate::types::diagnostic::Diagnostics;
use crate::types::document::Document;

#[cfg(test)]
mod tests;

/// Element holding the whole story
pub const CONTAINER_ELEMENT: &str = "tw-storydata";
/// Element holding one passage
pub const PASSAGE_ELEMENT: &str = "tw-passagedata";

pub const ATTR_NAME: &str = "name";
pub const ATTR_TAGS: &str = "tags";
pub const ATTR_GUID: &str = "ifid";

/// Receiver of markup events
pub trait EventHandler {
    fn start_element(&mut self, name: &str, attrs: &[(String, String)]);
    fn text(&mut self, data: &str);
    fn end_element(&mut self, name: &str);
}

/// Producer of markup events, e.g. an HTML tokenizer
pub trait EventSource {
    /// Push every event to `handler`, in document order
    fn drive(&self, handler: &mut dyn EventHandler) -> Result<(), CompileError>;
}

#[derive(Debug)]
enum State {
    Idle,
    InContainer,
    InPassage(RawNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Idle,
    InContainer,
    InPassage,
}

fn attribute<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.trim())
}

/// Result of one compile call
#[derive(Debug)]
pub struct Compilation {
    pub builder: DocumentBuilder,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Build the document. `None` means it is invalid and nothing should be written.
    pub fn finalize(&mut self) -> Option<Document> {
        self.builder.finalize(&mut self.diagnostics)
    }

    /// Build the document and hand back the diagnostics with it
    pub fn into_parts(mut self) -> (Option<Document>, Diagnostics) {
        let document = self.finalize();
        (document, self.diagnostics)
    }
}

/// Event-driven compiler for a single story
pub struct GraphCompiler<'a> {
    config: &'a CompileConfig,
    state: State,
    /// Rejected elements whose end tags must be skipped
    skipped_passages: usize,
    skipped_containers: usize,
    builder: DocumentBuilder,
    diagnostics: Diagnostics,
}

impl<'a> GraphCompiler<'a> {
    pub fn new(config: &'a CompileConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            skipped_passages: 0,
            skipped_containers: 0,
            builder: DocumentBuilder::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Compile everything `source` reports. Only event source failures are errors.
    pub fn compile(source: &dyn EventSource, config: &'a CompileConfig) -> Result<Compilation, CompileError> {
        let mut compiler = GraphCompiler::new(config);
        source.drive(&mut compiler)?;
        Ok(compiler.finish())
    }

    /// Close whatever is still open and return the result
    pub fn finish(mut self) -> Compilation {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::InPassage(raw) => {
                self.diagnostics.warn("Passage", "source ended inside a passage");
                self.finish_passage(raw);
                self.finish_container();
            }
            State::InContainer => {
                self.diagnostics.warn("Dialogue", "source ended inside the story data");
                self.finish_container();
            }
            State::Idle => {}
        }

        Compilation {
            builder: self.builder,
            diagnostics: self.diagnostics,
        }
    }

    fn cursor(&self) -> Cursor {
        match self.state {
            State::Idle => Cursor::Idle,
            State::InContainer => Cursor::InContainer,
            State::InPassage(_) => Cursor::InPassage,
        }
    }

    fn current_passage_name(&self) -> String {
        match &self.state {
            State::InPassage(raw) => raw.name.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn start_container(&mut self, attrs: &[(String, String)]) {
        if let Some(name) = attribute(attrs, ATTR_NAME) {
            self.builder.set_name(name);
        }
        if let Some(guid) = attribute(attrs, ATTR_GUID) {
            self.builder.set_raw_guid(guid);
        }
        self.state = State::InContainer;
    }

    fn finish_container(&mut self) {
        if let Err(error) = self.builder.parse_guid() {
            self.diagnostics.error("Dialogue", error.to_string());
        }
    }

    fn start_passage(&mut self, attrs: &[(String, String)]) {
        self.state = State::InPassage(RawNode {
            name: attribute(attrs, ATTR_NAME).map(str::to_string),
            tags: attribute(attrs, ATTR_TAGS).map(str::to_string),
            body: String::new(),
        });
    }

    fn finish_passage(&mut self, raw: RawNode) {
        let parsed = raw.parse(self.config, &mut self.diagnostics);
        self.builder.push_node(parsed);
    }
}

impl EventHandler for GraphCompiler<'_> {
    fn start_element(&mut self, name: &str, attrs: &[(String, String)]) {
        if name.eq_ignore_ascii_case(CONTAINER_ELEMENT) {
            match self.cursor() {
                Cursor::Idle => self.start_container(attrs),
                Cursor::InContainer | Cursor::InPassage => {
                    self.diagnostics
                        .warn("Dialogue", "found nested story data, ignoring it");
                    self.skipped_containers += 1;
                }
            }
        } else if name.eq_ignore_ascii_case(PASSAGE_ELEMENT) {
            match self.cursor() {
                Cursor::InContainer => self.start_passage(attrs),
                Cursor::InPassage => {
                    let outer = self.current_passage_name();
                    self.diagnostics.warn(
                        format!("Node Name = {outer}"),
                        format!(
                            "contains a nested passage `{}`, ignoring it",
                            attribute(attrs, ATTR_NAME).unwrap_or_default()
                        ),
                    );
                    self.skipped_passages += 1;
                }
                Cursor::Idle => {
                    self.diagnostics
                        .warn("Passage", "found outside of the story data, ignoring it");
                    self.skipped_passages += 1;
                }
            }
        }
    }

    fn text(&mut self, data: &str) {
        if let State::InPassage(raw) = &mut self.state {
            raw.push_text(data);
        }
    }

    fn end_element(&mut self, name: &str) {
        if name.eq_ignore_ascii_case(PASSAGE_ELEMENT) {
            if self.skipped_passages > 0 {
                self.skipped_passages -= 1;
                return;
            }
            if self.cursor() != Cursor::InPassage {
                return;
            }
            if let State::InPassage(raw) = std::mem::replace(&mut self.state, State::InContainer) {
                self.finish_passage(raw);
            }
        } else if name.eq_ignore_ascii_case(CONTAINER_ELEMENT) {
            if self.skipped_containers > 0 {
                self.skipped_containers -= 1;
                return;
            }
            match std::mem::replace(&mut self.state, State::Idle) {
                State::InContainer => self.finish_container(),
                State::InPassage(raw) => {
                    self.diagnostics
                        .warn("Passage", "story data ended inside a passage");
                    self.finish_passage(raw);
                    self.finish_container();
                }
                // Closing a story data that was never opened
                State::Idle => {}
            }
        }
    }
}

/// Compile a Twine HTML document
pub fn compile_html(html: &str, config: &CompileConfig) -> Result<Compilation, CompileError> {
    GraphCompiler::compile(&TwineHtmlSource::new(html), config)
}
