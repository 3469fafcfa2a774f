//! Command line interface
//!
//! `twinegraph compile` mirrors a directory of Twine HTML stories into
//! `.dlg_human.json` documents, `dump` compiles a single file to stdout and
//! `spellcheck` runs aspell over compiled documents.

pub mod logger;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::compiler::compile_html;
use crate::config::CompileConfig;
use crate::export::{ExportOutcome, Exporter, input_hash};
use crate::spellcheck::{AspellChecker, find_documents, load_document, spellcheck_document};

#[derive(Debug, Parser)]
#[command(name = "twinegraph", version)]
#[command(about = "Compile Twine dialogue stories into dialogue graph JSON", long_about = None)]
pub struct Cli {
    /// Log every parsed passage
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON file overriding the compile settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile every Twine HTML file below SRC into DST, keeping the directory layout
    Compile {
        #[arg(default_value = "DialoguesTwine/")]
        src: PathBuf,
        #[arg(default_value = "DialoguesJsonHumanText/")]
        dst: PathBuf,
    },
    /// Compile one Twine HTML file and print the document
    Dump { file: PathBuf },
    /// Spellcheck every compiled document below DIR with aspell
    Spellcheck {
        #[arg(default_value = "DialoguesJsonHumanText/")]
        dir: PathBuf,
        #[arg(long, default_value = "en_us")]
        language: String,
    },
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn load_config(&self) -> Result<CompileConfig> {
        match &self.config {
            Some(path) => Ok(CompileConfig::load(path)?),
            None => Ok(CompileConfig::default()),
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    match cli.command {
        Command::Compile { src, dst } => run_compile(config, &src, &dst).await,
        Command::Dump { file } => run_dump(&config, &file).await,
        Command::Spellcheck { dir, language } => run_spellcheck(&config, &dir, language).await,
    }
}

async fn run_compile(config: CompileConfig, src: &Path, dst: &Path) -> Result<()> {
    let summary = Exporter::new(config)
        .export_directory(src, dst)
        .await
        .with_context(|| format!("Failed to export {}", src.display()))?;

    for record in &summary.records {
        match &record.outcome {
            ExportOutcome::Written(path) => {
                println!("{} -> {}", record.source.display(), path.display())
            }
            ExportOutcome::Skipped(reason) => {
                println!("{} skipped: {reason}", record.source.display())
            }
            ExportOutcome::Failed(message) => {
                println!("{} failed: {message}", record.source.display())
            }
        }
    }
    println!("{summary}");
    Ok(())
}

async fn run_dump(config: &CompileConfig, file: &Path) -> Result<()> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read file '{}'", file.display()))?;

    let (document, diagnostics) = compile_html(&html, config)
        .with_context(|| format!("Failed to compile '{}'", file.display()))?
        .into_parts();

    match document {
        Some(document) => println!("{}", document.to_json(config.indent)?),
        None => println!("{} is not a valid dialogue document", file.display()),
    }
    eprintln!(
        "input_hash = {}, {} warning(s), {} error(s)",
        input_hash(&html),
        diagnostics.warning_count(),
        diagnostics.error_count()
    );
    Ok(())
}

async fn run_spellcheck(config: &CompileConfig, dir: &Path, language: String) -> Result<()> {
    anyhow::ensure!(dir.is_dir(), "`{}` is not a directory", dir.display());
    log::info!("Finding json human text files inside directory = {}", dir.display());

    let checker = AspellChecker::new(language);
    let mut total = 0;
    for path in find_documents(dir, &config.output_extension)? {
        log::info!("Reading file = `{}`", path.display());
        let document = match load_document(&path).await {
            Ok(document) => document,
            Err(e) => {
                log::error!("{e}");
                continue;
            }
        };

        let issues = spellcheck_document(&document, &checker).await?;
        for issue in &issues {
            log::warn!("{issue}");
        }
        total += issues.len();
    }

    println!("{total} spelling issue(s)");
    Ok(())
}
