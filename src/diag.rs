//! Diagnostics collected during a run — lenient by design.
//!
//! Tag and resolution problems never abort a run; they accumulate here and
//! the caller decides what to do with them (print, fail in strict mode).

use serde::Serialize;

/// How bad a diagnostic is.
///
/// Errors mean the offending doclet was produced with best-effort partial
/// data. Warnings mean the questionable value was kept, not discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single problem found while processing annotations.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineno: Option<usize>,
}

/// Ordered collector for diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, meta: Option<&crate::doclet::Meta>) {
        self.push(Severity::Error, message.into(), meta);
    }

    pub fn warning(&mut self, message: impl Into<String>, meta: Option<&crate::doclet::Meta>) {
        self.push(Severity::Warning, message.into(), meta);
    }

    fn push(&mut self, severity: Severity, message: String, meta: Option<&crate::doclet::Meta>) {
        self.entries.push(Diagnostic {
            severity,
            message,
            filename: meta.map(|m| m.filename.clone()),
            lineno: meta.map(|m| m.lineno),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
