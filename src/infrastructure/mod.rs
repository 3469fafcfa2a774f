//! Infrastructure layer - External dependencies and adapters
//!
//! HTML tokenizing and file system access live here, behind the
//! [`EventSource`](crate::compiler::EventSource) and [`DialogueSink`] seams.

pub mod repositories;
pub mod twine_html;

pub use repositories::{
    DialogueSink, FileSystemDialogueSink, InMemoryDialogueSink, SourceFile, TwineSourceRepository,
};
pub use twine_html::TwineHtmlSource;
