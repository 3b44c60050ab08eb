//! Diagnostics for degraded input.
//!
//! The engine never fails on bad data. It recovers locally and reports what
//! it did through a [`DiagnosticSink`] supplied by the caller.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, warn};

/// A degraded-input condition the engine recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A date value matched no known format and was passed through.
    UnparsedDate { field: String, value: String },
    /// An array or object was found where a scalar was expected.
    NonScalarValue { field: String },
    /// A field resolved for none of the records in a non-empty collection.
    UnresolvedField { field: String, records: usize },
    /// An age-range value that names no configured bucket.
    UnrecognizedAgeRange { value: String },
    /// A birth date that could not be parsed.
    UnparsedBirthDate { value: String },
    /// An age range whose label repeats an earlier range or the no-data
    /// bucket; the range was dropped.
    ConflictingAgeRange { label: String },
}

impl Diagnostic {
    /// True for conditions that usually point at caller misconfiguration
    /// rather than a single bad record.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedField { .. } | Self::ConflictingAgeRange { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparsedDate { field, value } => {
                write!(f, "unrecognized date format in {field}: {value:?}")
            }
            Self::NonScalarValue { field } => write!(f, "non-scalar value in {field}"),
            Self::UnresolvedField { field, records } => write!(
                f,
                "field {field} resolved for none of {records} records; check the field name"
            ),
            Self::UnrecognizedAgeRange { value } => {
                write!(f, "age range {value:?} matches no configured bucket")
            }
            Self::UnparsedBirthDate { value } => {
                write!(f, "unrecognized birth date: {value:?}")
            }
            Self::ConflictingAgeRange { label } => {
                write!(f, "age range {label:?} duplicates another bucket label; dropped")
            }
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_misconfiguration() {
            warn!(%diagnostic, "pivot input diagnostic");
        } else {
            debug!(%diagnostic, "pivot input diagnostic");
        }
    }
}

/// Discards diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

/// Stores diagnostics so callers (and tests) can inspect them.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let mut guard = self
            .diagnostics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.emit(&Diagnostic::NonScalarValue {
            field: "segment".to_string(),
        });
        sink.emit(&Diagnostic::UnrecognizedAgeRange {
            value: "adult".to_string(),
        });
        let seen = sink.diagnostics();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], Diagnostic::NonScalarValue { .. }));
    }

    #[test]
    fn display_names_the_field() {
        let diagnostic = Diagnostic::UnresolvedField {
            field: "segmnt".to_string(),
            records: 3,
        };
        assert!(diagnostic.to_string().contains("segmnt"));
        assert!(diagnostic.is_misconfiguration());
    }
}
