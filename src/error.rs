//! Error types
//!
//! Local problems (a bad edge, an incomplete sequence step) never show up
//! here; they are reported through [`crate::types::Diagnostics`]. These enums
//! cover document-level and environment failures only.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while compiling a single story
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Malformed story markup at byte {position}: {message}")]
    Markup { position: u64, message: String },

    #[error("Dialogue has no ifid")]
    MissingGuid,

    #[error("Dialogue ifid '{raw}' is not a valid UUID")]
    InvalidGuid {
        raw: String,
        #[source]
        source: uuid::Error,
    },
}

impl CompileError {
    pub fn markup(position: u64, message: impl Into<String>) -> Self {
        Self::Markup {
            position,
            message: message.into(),
        }
    }
}

/// Failures while reading sources or writing compiled documents
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid source directory {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Export task failed: {message}")]
    Task { message: String },
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the external spellchecker
#[derive(Debug, Error)]
pub enum SpellcheckError {
    #[error("Failed to run spellchecker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Spellchecker '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to load document {path}: {message}")]
    Load { path: PathBuf, message: String },
}
