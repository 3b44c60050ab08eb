//! Category label normalization.

use serde_json::Value;

use pivot_model::{ScalarText, scalar_text};

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Extracts a usable label from a resolved value.
///
/// Returns `None` for absent, empty-like and non-scalar values; non-scalar
/// values are also reported.
pub fn label_text(value: Option<&Value>, field: &str, sink: &dyn DiagnosticSink) -> Option<String> {
    match scalar_text(value?) {
        ScalarText::Text(text) => Some(text),
        ScalarText::Empty => None,
        ScalarText::NonScalar => {
            sink.emit(&Diagnostic::NonScalarValue {
                field: field.to_string(),
            });
            None
        }
    }
}

/// Removes the first matching prefix (e.g. `Problem:`) and trims again.
///
/// Returns `None` when nothing usable is left.
pub fn strip_label_prefix(label: &str, prefixes: &[String]) -> Option<String> {
    let stripped = prefixes
        .iter()
        .find_map(|prefix| label.strip_prefix(prefix.as_str()))
        .unwrap_or(label)
        .trim();
    if pivot_model::is_empty_like(stripped) {
        None
    } else {
        Some(stripped.to_string())
    }
}
