//! End-to-end compile tests over Twine HTML input

use twinegraph::types::Node;
use twinegraph::{CompileConfig, CompileError, Document, compile_html};

const IFID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn story(passages: &str) -> String {
    format!(r#"<tw-storydata name="Greeting" ifid="{IFID}" hidden>{passages}</tw-storydata>"#)
}

fn passage(name: &str, tags: &str, body: &str) -> String {
    format!(r#"<tw-passagedata name="{name}" tags="{tags}">{body}</tw-passagedata>"#)
}

fn compile(html: &str) -> (Option<Document>, twinegraph::Diagnostics) {
    compile_html(html, &CompileConfig::default())
        .expect("markup should tokenize")
        .into_parts()
}

#[test]
fn test_greeting_example() {
    let html = story(&passage(
        "1. Guard",
        "node-start",
        "Halt! [[Who goes there?|2. Guard]]",
    ));
    let (document, _) = compile(&html);
    let json: serde_json::Value =
        serde_json::from_str(&document.unwrap().to_json(4).unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "DialogueName": "Greeting",
            "DialogueGuid": "123E4567E89B12D3A456426614174000",
            "SpeechNodes": [{
                "NodeIndex": 1,
                "Speaker": "Guard",
                "Text": "Halt!",
                "Edges": [{"TargetNodeIndex": 2, "Text": "Who goes there?"}]
            }],
            "SpeechSequenceNodes": []
        })
    );
}

#[test]
fn test_speech_sequence_example() {
    let html = story(&passage(
        "4. Bob",
        "node-speech-sequence",
        "`` Speaker: `` //Bob// `` Text: `` //Hi// `` EdgeText: `` //Next//",
    ));
    let (document, _) = compile(&html);
    let document = document.unwrap();

    let sequence = &document.speech_sequence_nodes[0];
    assert_eq!(sequence.steps.len(), 1);
    assert_eq!(sequence.steps[0].speaker, "Bob");
    assert_eq!(sequence.steps[0].text, "Hi");
    assert_eq!(sequence.steps[0].edge_text, "Next");
    assert!(sequence.edges.is_empty());
}

#[test]
fn test_end_node_never_in_output() {
    let bodies = ["", "Farewell", "Bye [[Again|1. Guard]]"];
    for body in bodies {
        let html = story(&format!(
            "{}{}",
            passage("1. Guard", "node-start", "Halt!"),
            passage("2. Guard", "node-end", body)
        ));
        let (document, _) = compile(&html);
        let document = document.unwrap();

        assert!(document.speech_nodes.iter().all(|node| node.node_index != 2));
        assert!(document.speech_sequence_nodes.is_empty());
    }
}

#[test]
fn test_short_malformed_ifid_invalidates_document() {
    let html = format!(
        r#"<tw-storydata name="Greeting" ifid="1234-not-a-uuid">{}</tw-storydata>"#,
        passage("1. Guard", "node-start", "Halt!")
    );
    let compilation = compile_html(&html, &CompileConfig::default()).unwrap();

    assert_eq!(compilation.builder.nodes().len(), 1);
    assert_eq!(compilation.builder.nodes()[0].text.as_deref(), Some("Halt!"));
    assert!(compilation.diagnostics.has_errors());

    let (document, _) = compilation.into_parts();
    assert!(document.is_none());
}

#[test]
fn test_bad_name_and_links_are_warnings() {
    let html = story(&format!(
        "{}{}",
        passage("Guard without index", "node-speech", "Hello [[a|b|c]]"),
        passage("2. Guard", "node-speech", "Hi [[no target]] [[Ok|3. Guard]]")
    ));
    let (document, diagnostics) = compile(&html);
    let document = document.unwrap();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.warning_count() >= 3);
    assert_eq!(document.speech_nodes.len(), 1);
    assert_eq!(document.speech_nodes[0].edges.len(), 1);
    assert_eq!(document.speech_nodes[0].edges[0].target_node_index, 3);
}

#[test]
fn test_multiline_text_uses_crlf() {
    let html = story(&passage("1. Guard", "node-speech", "Halt!\nWho goes there?\n"));
    let (document, _) = compile(&html);

    assert_eq!(document.unwrap().speech_nodes[0].text, "Halt!\r\nWho goes there?");
}

#[test]
fn test_nodes_classified_into_buckets() {
    let html = story(&format!(
        "{}{}{}",
        passage("1. A", "node-virtual-parent", "Meanwhile"),
        passage(
            "2. B",
            "node-speech-sequence node-speech",
            "``Speaker:`` //B// ``Text:`` //x// ``EdgeText:`` //y//"
        ),
        passage("3. C", "unrelated", "Nothing")
    ));
    let (document, diagnostics) = compile(&html);
    let document = document.unwrap();

    let indices: Vec<i32> = document.speech_nodes.iter().map(|n| n.node_index).collect();
    assert_eq!(indices, vec![1]);
    assert_eq!(document.speech_sequence_nodes[0].node_index, 2);
    assert!(diagnostics.mentions("does not have any valid tags"));
}

#[test]
fn test_golden_guard_post() {
    let html = include_str!("fixtures/guard_post.html");
    let golden = include_str!("golden/guard_post.dlg_human.json");

    let (document, diagnostics) = compile(html);
    let document = document.expect("fixture should compile");
    assert!(!diagnostics.has_errors());

    let actual: serde_json::Value = serde_json::from_str(&document.to_json(4).unwrap()).unwrap();
    let expected: serde_json::Value = serde_json::from_str(golden).unwrap();
    assert_eq!(actual, expected);

    assert_eq!(Document::from_json(golden).unwrap(), document);
}

#[test]
fn test_golden_output_uses_four_space_indent() {
    let (document, _) = compile(include_str!("fixtures/guard_post.html"));
    let json = document.unwrap().to_json(4).unwrap();

    assert_eq!(json.trim_end(), include_str!("golden/guard_post.dlg_human.json").trim_end());
}

#[test]
fn test_typed_nodes() {
    let html = story(&passage("1. Guard", "node-speech", "Halt!"));
    let compilation = compile_html(&html, &CompileConfig::default()).unwrap();
    let node = compilation.builder.nodes()[0].to_node(&mut twinegraph::Diagnostics::new());

    match node {
        Some(Node::Speech(speech)) => assert_eq!(speech.text, "Halt!"),
        _ => panic!("Expected speech node"),
    }
}

#[test]
fn test_no_story_data_is_not_an_error() {
    match compile_html("<html><body><p>nothing here</p></body></html>", &CompileConfig::default()) {
        Ok(compilation) => {
            let (document, diagnostics) = compilation.into_parts();
            assert!(document.is_none());
            assert!(diagnostics.mentions("has no name"));
        }
        Err(CompileError::Markup { .. }) => panic!("Expected compile to succeed"),
        Err(other) => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn test_user_script_does_not_break_compile() {
    let html = format!(
        r#"<tw-storydata name="Greeting" ifid="{IFID}"><script role="script" id="twine-user-script" type="text/twine-javascript">if (a <!b) {{}}</script>{}</tw-storydata>"#,
        passage("1. Guard", "node-start", "Halt!")
    );
    let (document, _) = compile(&html);
    let document = document.expect("passages after the script should compile");

    assert_eq!(document.speech_nodes.len(), 1);
    assert_eq!(document.speech_nodes[0].text, "Halt!");
}

#[test]
fn test_html_entities_are_decoded() {
    let html = story(&passage(
        "1. Guard",
        "node-start",
        "Tom &amp; Jerry&nbsp;&hellip; [[Go &amp; see|2. X]]",
    ));
    let (document, _) = compile(&html);
    let node = &document.unwrap().speech_nodes[0];

    assert_eq!(node.text, "Tom & Jerry\u{a0}\u{2026}");
    assert_eq!(node.edges[0].text, "Go & see");
}
