//! Structured validation diagnostics
//!
//! Every soft inconsistency found by a validator is recorded as a
//! [`Diagnostic`] in a per-call [`ValidationReport`]. The report carries the
//! validity verdict; rendering the diagnostics as log lines is a separate
//! step ([`ValidationReport::emit`]) and never changes the verdict.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, does not affect validity
    Info,
    /// Inconsistency, the score is invalid
    Warning,
}

/// Which check produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    Slug,
    NamingConvention,
    UsulVariant,
    ExternalName,
    ExternalTag,
    KeySignature,
    MeasureStart,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticCategory::Slug => "slug",
            DiagnosticCategory::NamingConvention => "naming_convention",
            DiagnosticCategory::UsulVariant => "usul_variant",
            DiagnosticCategory::ExternalName => "external_name",
            DiagnosticCategory::ExternalTag => "external_tag",
            DiagnosticCategory::KeySignature => "key_signature",
            DiagnosticCategory::MeasureStart => "measure_start",
        };
        f.write_str(name)
    }
}

/// One reported inconsistency (or informational note)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: DiagnosticCategory,
    /// Score the diagnostic refers to (empty when not score specific)
    pub score: String,
    /// Field that was checked, e.g. "usul.mertebe"
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(
        category: DiagnosticCategory,
        score: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            score: score.into(),
            field: field.into(),
            observed: None,
            expected: None,
            message: message.into(),
        }
    }

    pub fn info(
        category: DiagnosticCategory,
        score: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::warning(category, score, field, message)
        }
    }

    pub fn observed(mut self, value: impl Into<String>) -> Self {
        self.observed = Some(value.into());
        self
    }

    pub fn expected(mut self, value: impl Into<String>) -> Self {
        self.expected = Some(value.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.score.is_empty() {
            write!(f, "{}: ", self.score)?;
        }
        f.write_str(&self.message)?;
        match (&self.observed, &self.expected) {
            (Some(observed), Some(expected)) => write!(f, " ({} -> {})", observed, expected),
            (Some(observed), None) => write!(f, " ({})", observed),
            (None, Some(expected)) => write!(f, " (expected {})", expected),
            (None, None) => Ok(()),
        }
    }
}

/// Validity verdict plus the diagnostics that led to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    valid: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    /// Empty, valid report
    pub fn new() -> Self {
        Self {
            valid: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Record a diagnostic; warnings invalidate the report
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Warning {
            self.valid = false;
        }
        self.diagnostics.push(diagnostic);
    }

    /// AND another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.valid &= other.valid;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Render all diagnostics as log events
    pub fn emit(&self) {
        for d in &self.diagnostics {
            match d.severity {
                Severity::Warning => warn!(
                    score = %d.score,
                    category = %d.category,
                    field = %d.field,
                    "{}",
                    d
                ),
                Severity::Info => info!(
                    score = %d.score,
                    category = %d.category,
                    field = %d.field,
                    "{}",
                    d
                ),
            }
        }
    }
}
