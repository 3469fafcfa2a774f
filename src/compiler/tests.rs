//! Tests for the compiler state machine

use super::*;

const IFID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Replays a fixed list of events
#[derive(Debug, Default)]
struct Script {
    events: Vec<Event>,
}

#[derive(Debug, Clone)]
enum Event {
    Start(&'static str, Vec<(String, String)>),
    Text(&'static str),
    End(&'static str),
}

impl Script {
    fn start(mut self, name: &'static str, attrs: &[(&str, &str)]) -> Self {
        let attrs = attrs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.events.push(Event::Start(name, attrs));
        self
    }

    fn text(mut self, data: &'static str) -> Self {
        self.events.push(Event::Text(data));
        self
    }

    fn end(mut self, name: &'static str) -> Self {
        self.events.push(Event::End(name));
        self
    }

    fn passage(self, name: &str, tags: &str, body: &'static str) -> Self {
        self.start(PASSAGE_ELEMENT, &[("name", name), ("tags", tags)])
            .text(body)
            .end(PASSAGE_ELEMENT)
    }
}

impl EventSource for Script {
    fn drive(&self, handler: &mut dyn EventHandler) -> Result<(), CompileError> {
        for event in &self.events {
            match event {
                Event::Start(name, attrs) => handler.start_element(name, attrs),
                Event::Text(data) => handler.text(data),
                Event::End(name) => handler.end_element(name),
            }
        }
        Ok(())
    }
}

struct Broken;

impl EventSource for Broken {
    fn drive(&self, handler: &mut dyn EventHandler) -> Result<(), CompileError> {
        handler.start_element(CONTAINER_ELEMENT, &[]);
        Err(CompileError::markup(12, "unexpected end of input"))
    }
}

fn greeting() -> Script {
    Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Greeting"), ("ifid", IFID)])
        .passage("1. Guard", "node-start", "Halt! [[Who goes there?|2. Guard]]")
        .passage("2. Guard", "node-speech", "State your name.")
        .end(CONTAINER_ELEMENT)
}

fn compile(script: &Script) -> (Option<Document>, Diagnostics) {
    let config = CompileConfig::default();
    GraphCompiler::compile(script, &config).unwrap().into_parts()
}

#[test]
fn compiles_greeting_story() {
    let (document, diagnostics) = compile(&greeting());
    let document = document.expect("document should be valid");

    assert!(!diagnostics.has_errors());
    assert_eq!(document.name, "Greeting");
    assert_eq!(document.guid.as_str(), "123E4567E89B12D3A456426614174000");
    assert_eq!(document.speech_nodes.len(), 2);
    assert!(document.speech_sequence_nodes.is_empty());

    let start = &document.speech_nodes[0];
    assert_eq!(start.node_index, 1);
    assert_eq!(start.text, "Halt!");
    assert_eq!(start.edges[0].target_node_index, 2);
    assert_eq!(start.edges[0].text, "Who goes there?");

    let reply = &document.speech_nodes[1];
    assert_eq!(reply.text, "State your name.");
    assert!(reply.edges.is_empty());
}

#[test]
fn text_events_accumulate() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Split"), ("ifid", IFID)])
        .start(PASSAGE_ELEMENT, &[("name", "1. Guard"), ("tags", "node-speech")])
        .text("Halt")
        .text(" right ")
        .text("there!")
        .end(PASSAGE_ELEMENT)
        .end(CONTAINER_ELEMENT);

    let (document, _) = compile(&script);
    assert_eq!(document.unwrap().speech_nodes[0].text, "Halt right there!");
}

#[test]
fn nested_passage_is_ignored() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Nested"), ("ifid", IFID)])
        .start(PASSAGE_ELEMENT, &[("name", "1. Outer"), ("tags", "node-speech")])
        .text("Before ")
        .start(PASSAGE_ELEMENT, &[("name", "2. Inner"), ("tags", "node-speech")])
        .text("inside ")
        .end(PASSAGE_ELEMENT)
        .text("after")
        .end(PASSAGE_ELEMENT)
        .end(CONTAINER_ELEMENT);

    let (document, diagnostics) = compile(&script);
    let document = document.unwrap();

    assert_eq!(document.speech_nodes.len(), 1);
    assert_eq!(document.speech_nodes[0].node_index, 1);
    assert_eq!(document.speech_nodes[0].text, "Before inside after");
    assert!(diagnostics.mentions("nested passage `2. Inner`"));
}

#[test]
fn nested_story_data_does_not_close_the_outer_one() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Outer"), ("ifid", IFID)])
        .start(CONTAINER_ELEMENT, &[("name", "Inner"), ("ifid", "bogus")])
        .end(CONTAINER_ELEMENT)
        .passage("1. Guard", "node-speech", "Still here")
        .end(CONTAINER_ELEMENT);

    let (document, diagnostics) = compile(&script);
    let document = document.unwrap();

    assert_eq!(document.name, "Outer");
    assert_eq!(document.speech_nodes.len(), 1);
    assert!(diagnostics.mentions("nested story data"));
}

#[test]
fn passage_outside_story_data_is_ignored() {
    let script = Script::default()
        .passage("7. Stray", "node-speech", "Lost")
        .start(CONTAINER_ELEMENT, &[("name", "Greeting"), ("ifid", IFID)])
        .passage("1. Guard", "node-speech", "Halt!")
        .end(CONTAINER_ELEMENT);

    let (document, diagnostics) = compile(&script);
    let document = document.unwrap();

    assert_eq!(document.speech_nodes.len(), 1);
    assert_eq!(document.speech_nodes[0].node_index, 1);
    assert!(diagnostics.mentions("outside of the story data"));
}

#[test]
fn bad_ifid_reports_error_but_keeps_nodes() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Broken"), ("ifid", "1234-not-a-uuid")])
        .passage("1. Guard", "node-speech", "Halt!")
        .end(CONTAINER_ELEMENT);
    let config = CompileConfig::default();

    let mut compilation = GraphCompiler::compile(&script, &config).unwrap();
    assert!(compilation.diagnostics.has_errors());
    assert_eq!(compilation.builder.nodes().len(), 1);
    assert!(compilation.builder.guid().is_none());
    assert!(compilation.finalize().is_none());
}

#[test]
fn unterminated_story_data_is_closed_with_warning() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Cut"), ("ifid", IFID)])
        .start(PASSAGE_ELEMENT, &[("name", "1. Guard"), ("tags", "node-speech")])
        .text("Halt!");

    let (document, diagnostics) = compile(&script);
    let document = document.unwrap();

    assert_eq!(document.speech_nodes[0].text, "Halt!");
    assert!(diagnostics.mentions("ended inside a passage"));
}

#[test]
fn end_nodes_are_left_out() {
    let script = Script::default()
        .start(CONTAINER_ELEMENT, &[("name", "Greeting"), ("ifid", IFID)])
        .passage("1. Guard", "node-start", "Halt! [[Bye|2. Guard]]")
        .passage("2. Guard", "node-end", "Farewell")
        .end(CONTAINER_ELEMENT);

    let (document, _) = compile(&script);
    let indices: Vec<i32> = document
        .unwrap()
        .speech_nodes
        .iter()
        .map(|node| node.node_index)
        .collect();
    assert_eq!(indices, vec![1]);
}

#[test]
fn element_names_and_attributes_are_case_insensitive() {
    let script = Script::default()
        .start("TW-STORYDATA", &[("NAME", "Loud"), ("IFID", IFID)])
        .start("Tw-PassageData", &[("Name", "1. Guard"), ("Tags", "NODE-SPEECH")])
        .text("Halt!")
        .end("TW-PASSAGEDATA")
        .end("tw-storydata");

    let (document, _) = compile(&script);
    let document = document.unwrap();
    assert_eq!(document.name, "Loud");
    assert_eq!(document.speech_nodes[0].text, "Halt!");
}

#[test]
fn source_failure_is_an_error() {
    let config = CompileConfig::default();
    match GraphCompiler::compile(&Broken, &config) {
        Err(CompileError::Markup { position, .. }) => assert_eq!(position, 12),
        other => panic!("Expected markup error, got {other:?}"),
    }
}

#[test]
fn stray_passage_end_keeps_state() {
    let script = Script::default()
        .end(PASSAGE_ELEMENT)
        .passage("9. Stray", "node-speech", "Lost")
        .start(CONTAINER_ELEMENT, &[("name", "Greeting"), ("ifid", IFID)])
        .passage("1. Guard", "node-speech", "Halt!")
        .end(CONTAINER_ELEMENT);

    let (document, _) = compile(&script);
    let indices: Vec<i32> = document
        .unwrap()
        .speech_nodes
        .iter()
        .map(|node| node.node_index)
        .collect();
    assert_eq!(indices, vec![1]);
}
