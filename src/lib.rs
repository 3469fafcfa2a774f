//! # twinegraph
//!
//! A Rust library that compiles Twine 2 dialogue stories, published as HTML,
//! into typed dialogue graphs serialized as "human text" JSON.
//!
//! Passages become nodes: the passage name carries the node index and the
//! speaker, passage tags decide the node kind, `[[text|target]]` links become
//! edges, and speech sequence passages hold `---` separated inner steps.
//! Malformed content is dropped and reported as [`Diagnostics`]; it never
//! aborts a compile.
//!
//! ## Quick Start
//!
//! ```rust
//! use twinegraph::{CompileConfig, compile_html};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = r#"
//! <tw-storydata name="Greeting" ifid="123e4567-e89b-12d3-a456-426614174000">
//!   <tw-passagedata name="1. Guard" tags="node-start">Halt! [[Who goes there?|2. Guard]]</tw-passagedata>
//!   <tw-passagedata name="2. Guard" tags="node-speech">State your name.</tw-passagedata>
//! </tw-storydata>
//! "#;
//!
//! let config = CompileConfig::default();
//! let (document, diagnostics) = compile_html(html, &config)?.into_parts();
//! let document = document.expect("valid dialogue");
//!
//! assert_eq!(document.guid.as_str(), "123E4567E89B12D3A456426614174000");
//! assert_eq!(document.speech_nodes[0].edges[0].target_node_index, 2);
//! assert_eq!(diagnostics.warning_count(), 0);
//! println!("{}", document.to_json(config.indent)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Exporting a Directory
//!
//! ```rust,no_run
//! use twinegraph::{CompileConfig, Exporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = Exporter::new(CompileConfig::default());
//! let summary = exporter
//!     .export_directory("DialoguesTwine/", "DialoguesJsonHumanText/")
//!     .await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod infrastructure;
pub mod parser;
pub mod spellcheck;
pub mod types;

pub use builder::DocumentBuilder;
pub use compiler::{Compilation, EventHandler, EventSource, GraphCompiler, compile_html};
pub use config::{CompileConfig, LineEnding};
pub use error::{CompileError, ConfigError, ExportError, SpellcheckError};
pub use export::{ExportOutcome, ExportRecord, ExportSummary, Exporter};
pub use infrastructure::{DialogueSink, FileSystemDialogueSink, TwineHtmlSource};
pub use spellcheck::{AspellChecker, Spellchecker, SpellingIssue, spellcheck_document};
pub use types::{Diagnostics, Document, Node, NodeIndex};
