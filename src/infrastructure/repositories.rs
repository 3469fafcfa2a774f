//! Source and output storage for dialogue exports

use crate::config::CompileConfig;
use crate::error::ExportError;
use crate::types::document::Document;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use walkdir::WalkDir;

/// A Twine source found under a source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the source root, mirrored in the output tree
    pub relative: PathBuf,
}

/// Twine HTML files below a root directory
pub struct TwineSourceRepository {
    root: PathBuf,
    config: CompileConfig,
}

impl TwineSourceRepository {
    pub fn new<P: Into<PathBuf>>(root: P, config: &CompileConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every source file, sorted by path
    pub fn list_sources(&self) -> Result<Vec<SourceFile>, ExportError> {
        if !self.root.is_dir() {
            return Err(ExportError::InvalidSource {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            });
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                ExportError::io(path, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.config.is_source_file(entry.path()) {
                log::debug!("Skipping {}", entry.path().display());
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            sources.push(SourceFile {
                path: entry.into_path(),
                relative,
            });
        }

        Ok(sources)
    }

    pub async fn load_source(&self, source: &SourceFile) -> Result<String, ExportError> {
        tokio::fs::read_to_string(&source.path)
            .await
            .map_err(|e| ExportError::io(&source.path, e))
    }
}

/// Destination for compiled documents
#[async_trait]
pub trait DialogueSink: Send + Sync {
    /// Store `document` compiled from the source at `relative`. Returns where it went.
    async fn write_document(
        &self,
        relative: &Path,
        document: &Document,
    ) -> Result<PathBuf, ExportError>;
}

/// Writes documents as JSON files, mirroring the source tree
pub struct FileSystemDialogueSink {
    root: PathBuf,
    extension: String,
    indent: usize,
}

impl FileSystemDialogueSink {
    pub fn new<P: Into<PathBuf>>(root: P, config: &CompileConfig) -> Self {
        Self {
            root: root.into(),
            extension: config.output_extension.clone(),
            indent: config.indent,
        }
    }

    /// `<root>/<relative dir>/<stem><extension>`
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        let stem = relative
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = match relative.parent() {
            Some(parent) => self.root.join(parent),
            None => self.root.clone(),
        };
        directory.join(format!("{stem}{}", self.extension))
    }
}

#[async_trait]
impl DialogueSink for FileSystemDialogueSink {
    async fn write_document(
        &self,
        relative: &Path,
        document: &Document,
    ) -> Result<PathBuf, ExportError> {
        let path = self.output_path(relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExportError::io(parent, e))?;
        }

        let json = document
            .to_json(self.indent)
            .map_err(|e| ExportError::Serialization {
                message: format!("Failed to serialize {}: {e}", document.name),
            })?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| ExportError::io(&path, e))?;

        Ok(path)
    }
}

/// In-memory sink for testing
#[derive(Default)]
pub struct InMemoryDialogueSink {
    documents: Mutex<Vec<(PathBuf, Document)>>,
}

impl InMemoryDialogueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored documents, sorted by source path
    pub fn documents(&self) -> Vec<(PathBuf, Document)> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        documents
    }
}

#[async_trait]
impl DialogueSink for InMemoryDialogueSink {
    async fn write_document(
        &self,
        relative: &Path,
        document: &Document,
    ) -> Result<PathBuf, ExportError> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((relative.to_path_buf(), document.clone()));
        Ok(relative.to_path_buf())
    }
}
