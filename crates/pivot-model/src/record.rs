//! Loosely typed observation and patient records.
//!
//! Records arrive from heterogeneous upstream exports, so keys are not
//! statically known. A record is a JSON object; the engine only ever borrows
//! it.

use serde_json::Value;

use crate::error::{PivotError, Result};

/// One observation (note/event) or one patient, as a key/value mapping.
pub type Record = serde_json::Map<String, Value>;

/// Scalar view of a record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarText {
    /// A usable, trimmed text value.
    Text(String),
    /// Null, missing, or text that is empty-like after trimming.
    Empty,
    /// An array or object where a scalar was expected.
    NonScalar,
}

/// Renders a JSON value as trimmed text.
///
/// Strings are trimmed, numbers use their JSON text and booleans render as
/// `true`/`false`. Empty-like strings (see [`is_empty_like`]) map to
/// [`ScalarText::Empty`].
pub fn scalar_text(value: &Value) -> ScalarText {
    match value {
        Value::Null => ScalarText::Empty,
        Value::String(s) => {
            let trimmed = s.trim();
            if is_empty_like(trimmed) {
                ScalarText::Empty
            } else {
                ScalarText::Text(trimmed.to_string())
            }
        }
        Value::Number(n) => ScalarText::Text(n.to_string()),
        Value::Bool(b) => ScalarText::Text(b.to_string()),
        Value::Array(_) | Value::Object(_) => ScalarText::NonScalar,
    }
}

/// Returns true for empty text and the literal placeholders `null` and
/// `undefined` that upstream serializers leave behind.
pub fn is_empty_like(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("undefined")
}

/// Converts a parsed JSON document into a record collection.
///
/// The document must be an array whose elements are all objects.
pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(PivotError::NotARecordSequence(
            "expected a JSON array at the top level".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(PivotError::NotARecordSequence(format!(
                "element {index} is {}, expected an object",
                value_kind(&other)
            ))),
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_text_trims_and_flags_placeholders() {
        assert_eq!(
            scalar_text(&json!("  Pain ")),
            ScalarText::Text("Pain".to_string())
        );
        assert_eq!(scalar_text(&json!("undefined")), ScalarText::Empty);
        assert_eq!(scalar_text(&json!("NULL")), ScalarText::Empty);
        assert_eq!(scalar_text(&json!(null)), ScalarText::Empty);
        assert_eq!(scalar_text(&json!(42)), ScalarText::Text("42".to_string()));
        assert_eq!(
            scalar_text(&json!(true)),
            ScalarText::Text("true".to_string())
        );
        assert_eq!(scalar_text(&json!(["a"])), ScalarText::NonScalar);
    }

    #[test]
    fn records_from_value_rejects_non_arrays() {
        assert!(records_from_value(json!({"segment": "Pain"})).is_err());
        assert!(records_from_value(json!([{"segment": "Pain"}, 3])).is_err());
        let records = records_from_value(json!([{"segment": "Pain"}])).unwrap();
        assert_eq!(records.len(), 1);
    }
}
