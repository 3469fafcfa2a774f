//! Compiler configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Line ending written into every normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Edge texts containing any of these (case-insensitive) compile to an empty text
    pub empty_edge_tokens: Vec<String>,
    /// Line ending used by text normalization
    pub line_ending: LineEnding,
    /// Extension of Twine source files, without the dot
    pub source_extension: String,
    /// Suffix appended to the source file stem when writing
    pub output_extension: String,
    /// JSON indentation width
    pub indent: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            empty_edge_tokens: vec!["~ignore~".to_string(), "$$empty$$".to_string()],
            line_ending: LineEnding::Crlf,
            source_extension: "html".to_string(),
            output_extension: ".dlg_human.json".to_string(),
            indent: 4,
        }
    }
}

impl CompileConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// True if `text` asks for an empty edge text
    pub fn is_empty_edge_marker(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.empty_edge_tokens
            .iter()
            .any(|token| !token.is_empty() && lowered.contains(&token.to_lowercase()))
    }

    /// True if `path` has the configured source extension
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.source_extension))
    }
}
