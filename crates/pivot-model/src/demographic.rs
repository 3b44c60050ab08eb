//! Indicator-by-age-range cross-tabulation over patient-level records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label of the bucket for patients without any usable age information.
pub const NO_DATA_BUCKET: &str = "No Data Available";

/// How an indicator value is judged affirmative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// Affirmative for `"Yes"` (any case) or boolean `true`.
    #[default]
    Boolean,
    /// Affirmative for any non-empty value (coverage, not yes/no).
    Demographic,
}

/// A patient-level field tabulated as one row of the demographic cross-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub field: String,
    #[serde(default)]
    pub kind: IndicatorKind,
}

impl Indicator {
    pub fn boolean(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IndicatorKind::Boolean,
        }
    }

    pub fn demographic(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IndicatorKind::Demographic,
        }
    }
}

/// Health-related social need indicators tabulated by default.
pub fn default_indicators() -> Vec<Indicator> {
    vec![
        Indicator::boolean("housing_insecurity"),
        Indicator::boolean("food_insecurity"),
        Indicator::boolean("transportation_insecurity"),
        Indicator::boolean("utility_insecurity"),
        Indicator::boolean("interpersonal_safety"),
        Indicator::demographic("gender"),
        Indicator::demographic("race"),
        Indicator::demographic("ethnicity"),
    ]
}

/// Inclusive age range with an optional open upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub label: String,
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
}

impl AgeRange {
    pub fn new(label: impl Into<String>, min: u32, max: Option<u32>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }
}

/// Default age buckets, youngest first.
pub fn default_age_ranges() -> Vec<AgeRange> {
    vec![
        AgeRange::new("0-17", 0, Some(17)),
        AgeRange::new("18-25", 18, Some(25)),
        AgeRange::new("26-35", 26, Some(35)),
        AgeRange::new("36-45", 36, Some(45)),
        AgeRange::new("46-55", 46, Some(55)),
        AgeRange::new("56-64", 56, Some(64)),
        AgeRange::new("65+", 65, None),
    ]
}

/// Percentage of each age bucket for which an indicator is affirmative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicCrossTab {
    /// Indicator fields in the order requested.
    pub rows: Vec<String>,
    /// Age bucket labels; the no-data bucket is always last.
    pub columns: Vec<String>,
    /// Percentages (one decimal) keyed by indicator then bucket.
    pub cells: BTreeMap<String, BTreeMap<String, f64>>,
    /// Patients per bucket.
    pub bucket_sizes: BTreeMap<String, usize>,
    /// Largest percentage in `cells`, for colour-scale normalization.
    pub max_percentage: f64,
    /// Patients grouped.
    pub total_records: usize,
}

impl DemographicCrossTab {
    /// Percentage for a pair, zero when absent.
    pub fn percentage(&self, indicator: &str, bucket: &str) -> f64 {
        self.cells
            .get(indicator)
            .and_then(|buckets| buckets.get(bucket))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_range_bounds_are_inclusive() {
        let range = AgeRange::new("18-25", 18, Some(25));
        assert!(range.contains(18));
        assert!(range.contains(25));
        assert!(!range.contains(26));
        assert!(AgeRange::new("65+", 65, None).contains(102));
    }

    #[test]
    fn default_ranges_cover_every_age_once() {
        let ranges = default_age_ranges();
        for age in 0..=120 {
            let hits = ranges.iter().filter(|r| r.contains(age)).count();
            assert_eq!(hits, 1, "age {age}");
        }
    }
}
