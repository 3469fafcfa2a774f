//! Batch export of a Twine source tree
//!
//! Every source file is compiled in its own tokio task. A file that cannot be
//! read, tokenized or written is recorded as failed; the batch keeps going.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;

use crate::compiler::compile_html;
use crate::config::CompileConfig;
use crate::error::ExportError;
use crate::infrastructure::repositories::{
    DialogueSink, FileSystemDialogueSink, SourceFile, TwineSourceRepository,
};

/// md5 hex digest of a source text
pub fn input_hash(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

/// What happened to one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExportOutcome {
    Written(PathBuf),
    /// The document is invalid and nothing was written
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    /// Source path relative to the source root
    pub source: PathBuf,
    /// `None` if the source could not be read
    pub input_hash: Option<String>,
    pub warnings: usize,
    pub errors: usize,
    pub outcome: ExportOutcome,
}

impl ExportRecord {
    fn failed(source: &SourceFile, input_hash: Option<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.relative.clone(),
            input_hash,
            warnings: 0,
            errors: 0,
            outcome: ExportOutcome::Failed(message.into()),
        }
    }
}

/// Result of one batch, sorted by source path
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub records: Vec<ExportRecord>,
}

impl ExportSummary {
    pub fn written(&self) -> usize {
        self.count(|outcome| matches!(outcome, ExportOutcome::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ExportOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ExportOutcome::Failed(_)))
    }

    pub fn record(&self, source: impl AsRef<Path>) -> Option<&ExportRecord> {
        self.records.iter().find(|record| record.source == source.as_ref())
    }

    fn count(&self, predicate: impl Fn(&ExportOutcome) -> bool) -> usize {
        self.records.iter().filter(|record| predicate(&record.outcome)).count()
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} written, {} skipped, {} failed",
            self.records.len(),
            self.written(),
            self.skipped(),
            self.failed()
        )
    }
}

pub struct Exporter {
    config: Arc<CompileConfig>,
}

impl Exporter {
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compile every source under `src` into JSON files under `dst`
    pub async fn export_directory(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> Result<ExportSummary, ExportError> {
        let dst = dst.as_ref();
        let repository = TwineSourceRepository::new(src.as_ref(), &self.config);
        let sources = repository.list_sources()?;

        tokio::fs::create_dir_all(dst)
            .await
            .map_err(|e| ExportError::io(dst, e))?;

        let sink: Arc<dyn DialogueSink> = Arc::new(FileSystemDialogueSink::new(dst, &self.config));
        self.export_sources(repository, sources, sink).await
    }

    /// Compile every source under `src` into `sink`
    pub async fn export_to(
        &self,
        src: impl AsRef<Path>,
        sink: Arc<dyn DialogueSink>,
    ) -> Result<ExportSummary, ExportError> {
        let repository = TwineSourceRepository::new(src.as_ref(), &self.config);
        let sources = repository.list_sources()?;
        self.export_sources(repository, sources, sink).await
    }

    async fn export_sources(
        &self,
        repository: TwineSourceRepository,
        sources: Vec<SourceFile>,
        sink: Arc<dyn DialogueSink>,
    ) -> Result<ExportSummary, ExportError> {
        log::info!(
            "Exporting {} source(s) from {}",
            sources.len(),
            repository.root().display()
        );

        let repository = Arc::new(repository);
        let mut tasks = JoinSet::new();
        for source in sources {
            let repository = Arc::clone(&repository);
            let config = Arc::clone(&self.config);
            let sink = Arc::clone(&sink);
            tasks.spawn(async move { export_one(&repository, &config, sink.as_ref(), source).await });
        }

        let mut records = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let record = joined.map_err(|e| ExportError::Task {
                message: e.to_string(),
            })?;
            records.push(record);
        }
        records.sort_by(|a, b| a.source.cmp(&b.source));

        Ok(ExportSummary { records })
    }
}

async fn export_one(
    repository: &TwineSourceRepository,
    config: &CompileConfig,
    sink: &dyn DialogueSink,
    source: SourceFile,
) -> ExportRecord {
    let html = match repository.load_source(&source).await {
        Ok(html) => html,
        Err(e) => {
            log::error!("{e}");
            return ExportRecord::failed(&source, None, e.to_string());
        }
    };
    let hash = input_hash(&html);

    log::info!("Compiling {}", source.relative.display());
    let (document, diagnostics) = match compile_html(&html, config) {
        Ok(compilation) => compilation.into_parts(),
        Err(e) => {
            let e = ExportError::from(e);
            log::error!("{}: {e}", source.relative.display());
            return ExportRecord::failed(&source, Some(hash), e.to_string());
        }
    };

    let outcome = match document {
        None => {
            log::warn!("{} is not a valid dialogue, skipping", source.relative.display());
            ExportOutcome::Skipped("invalid document".to_string())
        }
        Some(document) => match sink.write_document(&source.relative, &document).await {
            Ok(path) => {
                log::info!("Wrote {}", path.display());
                ExportOutcome::Written(path)
            }
            Err(e) => {
                log::error!("{e}");
                ExportOutcome::Failed(e.to_string())
            }
        },
    };

    ExportRecord {
        source: source.relative,
        input_hash: Some(hash),
        warnings: diagnostics.warning_count(),
        errors: diagnostics.error_count(),
        outcome,
    }
}
