//! Configuration for the pivot engine.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::demographic::{AgeRange, NO_DATA_BUCKET, default_age_ranges};
use crate::error::{PivotError, Result};

/// Additional key spellings for a logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub field: String,
    pub aliases: Vec<String>,
}

impl SynonymEntry {
    pub fn new<I, S>(field: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }
}

/// Placeholder row labels for records with no usable row value, keyed by
/// row-field identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelPolicy {
    /// Used for row fields without an entry in `by_field`.
    pub default_label: String,
    pub by_field: BTreeMap<String, String>,
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        let by_field = [
            ("segment", "Unspecified Symptom"),
            ("diagnosis", "Unclassified Diagnosis"),
            ("diagnostic_category", "Uncategorized"),
        ]
        .into_iter()
        .map(|(field, label)| (field.to_string(), label.to_string()))
        .collect();
        Self {
            default_label: "Unknown".to_string(),
            by_field,
        }
    }
}

impl SentinelPolicy {
    /// Sentinel label for a row field.
    pub fn label_for(&self, row_field: &str) -> &str {
        self.by_field
            .get(row_field)
            .map_or(self.default_label.as_str(), String::as_str)
    }

    #[must_use]
    pub fn with_label(mut self, row_field: impl Into<String>, label: impl Into<String>) -> Self {
        self.by_field.insert(row_field.into(), label.into());
        self
    }
}

/// Engine configuration. Every field has a default, so a configuration file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra synonyms, tried before the built-in aliases of the same field.
    pub synonyms: Vec<SynonymEntry>,
    pub sentinels: SentinelPolicy,
    /// Column fields expected to hold dates. Every column value is
    /// canonicalized; for these fields an unparsed value is also reported.
    pub date_fields: BTreeSet<String>,
    /// Field compared against a categorical filter value.
    pub discriminator_field: String,
    /// Prefixes stripped from row labels.
    pub label_prefixes: Vec<String>,
    pub age_ranges: Vec<AgeRange>,
    pub no_data_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            synonyms: Vec::new(),
            sentinels: SentinelPolicy::default(),
            date_fields: ["date", "event_date", "note_date"]
                .into_iter()
                .map(String::from)
                .collect(),
            discriminator_field: "event_type".to_string(),
            label_prefixes: vec!["Problem:".to_string()],
            age_ranges: default_age_ranges(),
            no_data_label: NO_DATA_BUCKET.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sentinels.default_label.trim().is_empty() {
            return Err(PivotError::Config(
                "sentinels.default_label must not be empty".to_string(),
            ));
        }
        if self.no_data_label.trim().is_empty() {
            return Err(PivotError::Config(
                "no_data_label must not be empty".to_string(),
            ));
        }
        if self.age_ranges.is_empty() {
            return Err(PivotError::Config(
                "age_ranges must contain at least one range".to_string(),
            ));
        }
        let mut labels = BTreeSet::new();
        for range in &self.age_ranges {
            if !labels.insert(range.label.to_ascii_lowercase()) {
                return Err(PivotError::Config(format!(
                    "duplicate age range label: {}",
                    range.label
                )));
            }
            if range.label.eq_ignore_ascii_case(&self.no_data_label) {
                return Err(PivotError::Config(format!(
                    "age range label {} collides with the no-data bucket",
                    range.label
                )));
            }
            if let Some(max) = range.max
                && max < range.min
            {
                return Err(PivotError::Config(format!(
                    "age range {} has max {} below min {}",
                    range.label, max, range.min
                )));
            }
        }
        Ok(())
    }

    pub fn is_date_field(&self, field: &str) -> bool {
        self.date_fields.contains(field)
    }

    #[must_use]
    pub fn with_synonym(mut self, entry: SynonymEntry) -> Self {
        self.synonyms.push(entry);
        self
    }

    #[must_use]
    pub fn with_sentinels(mut self, sentinels: SentinelPolicy) -> Self {
        self.sentinels = sentinels;
        self
    }

    #[must_use]
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_fields.insert(field.into());
        self
    }

    #[must_use]
    pub fn with_discriminator_field(mut self, field: impl Into<String>) -> Self {
        self.discriminator_field = field.into();
        self
    }

    #[must_use]
    pub fn with_age_ranges(mut self, ranges: Vec<AgeRange>) -> Self {
        self.age_ranges = ranges;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "sentinels": { "by_field": { "segment": "No Symptom" } } }"#,
        )
        .unwrap();
        assert_eq!(config.sentinels.label_for("segment"), "No Symptom");
        assert_eq!(config.sentinels.label_for("other"), "Unknown");
        assert_eq!(config.discriminator_field, "event_type");
        assert!(config.is_date_field("date"));
        assert_eq!(config.age_ranges.len(), 7);
    }

    #[test]
    fn rejects_inverted_age_range() {
        let err = EngineConfig::from_json_str(
            r#"{ "age_ranges": [ { "label": "bad", "min": 30, "max": 20 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PivotError::Config(_)));
    }

    #[test]
    fn rejects_duplicate_age_labels() {
        let config = EngineConfig::default().with_age_ranges(vec![
            AgeRange::new("adult", 18, Some(64)),
            AgeRange::new("Adult", 65, None),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_age_ranges() {
        let config = EngineConfig::default().with_age_ranges(Vec::new());
        assert!(config.validate().is_err());
    }
}
