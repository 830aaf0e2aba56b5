// Diagnostics collector
//
// An ordered, append-only sink of validation findings. Every rule function
// receives `&mut DiagnosticsCollector` and may append zero or more findings;
// nothing is ever mutated or removed once added. A validation pass always
// starts from a fresh, empty collector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding
///
/// Ordered so that `Critical` compares greater than `Warning`, which compares
/// greater than `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory or optimization guidance; may be suppressed in compact UIs
    Info,

    /// Legal but risky, unusual, or likely a mistake; never blocks saving
    Warning,

    /// Logically or mathematically invalid; blocks persistence
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One validation finding
///
/// The `code` is a stable machine-readable identifier independent of the
/// human message, so consumers and tests assert on codes rather than prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Append-only collection of diagnostics from one validation pass
///
/// Diagnostics are appended in a fixed, deterministic rule-group order for a
/// given input. Consumers should still treat the collection as a set keyed by
/// `code` rather than relying on positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsCollector {
    entries: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a critical diagnostic
    pub fn critical(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.entries
            .push(Diagnostic::new(code, message, Severity::Critical));
    }

    /// Append a warning diagnostic
    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.entries
            .push(Diagnostic::new(code, message, Severity::Warning));
    }

    /// Append an info diagnostic
    pub fn info(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.entries
            .push(Diagnostic::new(code, message, Severity::Info));
    }

    /// Append an already-built diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Append every diagnostic from another collector, in order
    pub fn merge(&mut self, other: DiagnosticsCollector) {
        self.entries.extend(other.entries);
    }

    /// True when any critical diagnostic is present (save must be blocked)
    pub fn has_critical(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == Severity::Critical)
    }

    /// True when a diagnostic with this code is present
    pub fn has_code(&self, code: &str) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// All codes, in append order
    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.code.as_str()).collect()
    }

    /// Diagnostics at exactly this severity
    pub fn at_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for DiagnosticsCollector {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
