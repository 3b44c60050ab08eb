use thiserror::Error;

/// Errors raised at the fallible edges of the engine: loading configuration
/// and reading record collections. Aggregation itself never fails.
#[derive(Debug, Error)]
pub enum PivotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("input is not a sequence of records: {0}")]
    NotARecordSequence(String),
}

pub type Result<T> = std::result::Result<T, PivotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_source() {
        let config = PivotError::Config("age_ranges must contain at least one range".to_string());
        assert_eq!(
            config.to_string(),
            "invalid configuration: age_ranges must contain at least one range"
        );
        let json = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        assert!(PivotError::from(json).to_string().starts_with("json error:"));
        let shape = crate::records_from_value(serde_json::json!({"segment": "Pain"})).unwrap_err();
        assert!(matches!(shape, PivotError::NotARecordSequence(_)));
    }
}
