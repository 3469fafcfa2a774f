//! Spellchecking of compiled dialogue documents

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use walkdir::WalkDir;

use crate::error::SpellcheckError;
use crate::types::document::Document;
use crate::types::node::{Edge, InnerStep, NodeIndex};

/// Finds misspelled words in a piece of text
#[async_trait]
pub trait Spellchecker: Send + Sync {
    async fn misspellings(&self, text: &str) -> Result<Vec<String>, SpellcheckError>;
}

/// Spellchecker backed by `aspell list`
#[derive(Debug, Clone)]
pub struct AspellChecker {
    pub program: String,
    pub language: String,
}

impl AspellChecker {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            program: "aspell".to_string(),
            language: language.into(),
        }
    }
}

impl Default for AspellChecker {
    fn default() -> Self {
        Self::new("en_us")
    }
}

#[async_trait]
impl Spellchecker for AspellChecker {
    async fn misspellings(&self, text: &str) -> Result<Vec<String>, SpellcheckError> {
        let spawn_error = |source| SpellcheckError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(["list", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(spawn_error)?;
            // Dropping stdin closes the pipe so aspell sees end of input
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        if !output.status.success() {
            return Err(SpellcheckError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }
}

/// Which text of a node a mistake was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextLocation {
    NodeText,
    Edge { target_node_index: NodeIndex },
    StepText { step: usize },
    StepEdgeText { step: usize },
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextLocation::NodeText => write!(f, "Text"),
            TextLocation::Edge { target_node_index } => {
                write!(f, "Edge TargetNodeIndex = {target_node_index}")
            }
            TextLocation::StepText { step } => write!(f, "Sequence Index = {step} Text"),
            TextLocation::StepEdgeText { step } => write!(f, "Sequence Index = {step} EdgeText"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellingIssue {
    pub node_index: NodeIndex,
    pub location: TextLocation,
    pub original: String,
    pub mistakes: Vec<String>,
}

impl fmt::Display for SpellingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node Index = {}, {}\n\tOriginal text = `{}`\n\tMistakes = `{}`",
            self.node_index,
            self.location,
            self.original,
            self.mistakes.join(" ")
        )
    }
}

/// Every text of a document that is worth checking, in document order
fn checked_texts(document: &Document) -> Vec<(NodeIndex, TextLocation, &str)> {
    fn edges<'a>(
        node_index: NodeIndex,
        edges: &'a [Edge],
        texts: &mut Vec<(NodeIndex, TextLocation, &'a str)>,
    ) {
        for edge in edges {
            let location = TextLocation::Edge {
                target_node_index: edge.target_node_index,
            };
            texts.push((node_index, location, &edge.text));
        }
    }

    fn steps<'a>(
        node_index: NodeIndex,
        steps: &'a [InnerStep],
        texts: &mut Vec<(NodeIndex, TextLocation, &'a str)>,
    ) {
        for (step, inner) in steps.iter().enumerate() {
            texts.push((node_index, TextLocation::StepText { step }, &inner.text));
            texts.push((node_index, TextLocation::StepEdgeText { step }, &inner.edge_text));
        }
    }

    let mut texts = Vec::new();
    for node in &document.speech_nodes {
        texts.push((node.node_index, TextLocation::NodeText, node.text.as_str()));
        edges(node.node_index, &node.edges, &mut texts);
    }
    for node in &document.speech_sequence_nodes {
        steps(node.node_index, &node.steps, &mut texts);
        edges(node.node_index, &node.edges, &mut texts);
    }

    texts.retain(|(_, _, text)| !text.trim().is_empty());
    texts
}

/// Run `checker` over every text of `document`
pub async fn spellcheck_document(
    document: &Document,
    checker: &dyn Spellchecker,
) -> Result<Vec<SpellingIssue>, SpellcheckError> {
    let mut issues = Vec::new();
    for (node_index, location, text) in checked_texts(document) {
        let mistakes = checker.misspellings(text).await?;
        if !mistakes.is_empty() {
            issues.push(SpellingIssue {
                node_index,
                location,
                original: text.to_string(),
                mistakes,
            });
        }
    }
    Ok(issues)
}

/// Read a compiled document from disk
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document, SpellcheckError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SpellcheckError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Document::from_json(&content).map_err(|e| SpellcheckError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Compiled documents below `dir`, sorted by path
pub fn find_documents(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>, SpellcheckError> {
    let dir = dir.as_ref();
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SpellcheckError::Load {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let is_document = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(extension));
        if is_document {
            documents.push(entry.into_path());
        } else {
            log::warn!(
                "Path = `{}` is not a file or not a valid json human text",
                entry.path().display()
            );
        }
    }
    Ok(documents)
}
