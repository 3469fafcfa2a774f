//! Structured diagnostics collected while compiling a story
//!
//! Every entry is also forwarded to the `log` facade, so a CLI run shows the
//! same warnings that tests assert on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// For your information
    Info,
    /// The offending edge, step or node was dropped
    Warning,
    /// The whole document is affected
    Error,
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Where it happened, e.g. `Node Index = 3`
    pub context: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    info_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => {
                log::error!("{diagnostic}");
                self.error_count += 1;
            }
            Severity::Warning => {
                log::warn!("{diagnostic}");
                self.warning_count += 1;
            }
            Severity::Info => {
                log::info!("{diagnostic}");
                self.info_count += 1;
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn info(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.report(Severity::Info, context, message);
    }

    pub fn warn(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.report(Severity::Warning, context, message);
    }

    pub fn error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.report(Severity::Error, context, message);
    }

    fn report(&mut self, severity: Severity, context: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn info_count(&self) -> usize {
        self.info_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
