use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unrecognized date \"{0}\"")]
    UnrecognizedDate(String),

    #[error("unrecognized release month \"{0}\"")]
    UnrecognizedMonth(String),

    #[error("invalid extraction payload for {source_name}: {source}")]
    ExtractionPayload {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Value could not be parsed; the raw value was kept.
    ParseFailure,
    /// Value parsed, but not in the shape the extraction step was asked for.
    FormatMismatch,
    /// Date parsed but the business-day shift could not be applied.
    AdjustmentFailed,
    /// Keyword was absent from a reference table.
    LookupMiss,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::ParseFailure => write!(f, "parse_failure"),
            DiagnosticKind::FormatMismatch => write!(f, "format_mismatch"),
            DiagnosticKind::AdjustmentFailed => write!(f, "adjustment_failed"),
            DiagnosticKind::LookupMiss => write!(f, "lookup_miss"),
        }
    }
}

/// A non-fatal, row-local problem noticed while assembling a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: &'static str,
    pub kind: DiagnosticKind,
    pub value: String,
}

impl Diagnostic {
    pub(crate) fn new(field: &'static str, kind: DiagnosticKind, value: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}: \"{}\"", self.kind, self.field, self.value)
    }
}
