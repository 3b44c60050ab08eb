//! Indicator-by-age-range cross-tab over one record per patient.
//!
//! Each patient lands in exactly one age bucket. Each cell holds the share of
//! the bucket, in percent with one decimal, for which the indicator is
//! affirmative.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, debug_span};

use pivot_model::{AgeRange, DemographicCrossTab, Indicator, IndicatorKind, Record, ScalarText, scalar_text};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::engine::PivotEngine;
use crate::normalization::age::{age_on, parse_age};
use crate::normalization::datetime::parse_date;
use crate::normalization::labels::label_text;

pub const AGE_RANGE_FIELD: &str = "age_range";
pub const AGE_FIELD: &str = "age";
pub const BIRTH_DATE_FIELD: &str = "birth_date";

/// Arguments for one demographic cross-tab.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRequest {
    pub indicators: Vec<Indicator>,
    /// Buckets to use instead of the configured ones.
    pub age_ranges: Option<Vec<AgeRange>>,
    /// Reference date for ages derived from birth dates; today when unset.
    pub as_of: Option<NaiveDate>,
}

impl Default for DemographicRequest {
    fn default() -> Self {
        Self::new(pivot_model::default_indicators())
    }
}

impl DemographicRequest {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self {
            indicators,
            age_ranges: None,
            as_of: None,
        }
    }

    #[must_use]
    pub fn with_age_ranges(mut self, ranges: Vec<AgeRange>) -> Self {
        self.age_ranges = Some(ranges);
        self
    }

    #[must_use]
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

impl PivotEngine {
    pub fn build_demographic(
        &self,
        patients: &[Record],
        request: &DemographicRequest,
        sink: &dyn DiagnosticSink,
    ) -> DemographicCrossTab {
        let span = debug_span!(
            "demographic",
            patients = patients.len(),
            indicators = request.indicators.len()
        );
        let _guard = span.enter();

        let no_data = self.config().no_data_label.as_str();
        let requested = request
            .age_ranges
            .as_deref()
            .unwrap_or(self.config().age_ranges.as_slice());
        let ranges = distinct_age_ranges(requested, no_data, sink);
        let ranges = ranges.as_slice();
        let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());

        let mut rows: Vec<String> = Vec::new();
        for indicator in &request.indicators {
            if !rows.contains(&indicator.field) {
                rows.push(indicator.field.clone());
            }
        }
        let indicators: Vec<&Indicator> = rows
            .iter()
            .filter_map(|field| request.indicators.iter().find(|i| &i.field == field))
            .collect();

        // Bucket index `ranges.len()` is the no-data bucket.
        let mut sizes = vec![0usize; ranges.len() + 1];
        let mut affirmative = vec![vec![0usize; ranges.len() + 1]; indicators.len()];

        for patient in patients {
            let bucket = self
                .assign_bucket(patient, ranges, as_of, sink)
                .unwrap_or(ranges.len());
            sizes[bucket] += 1;
            for (index, indicator) in indicators.iter().enumerate() {
                if is_affirmative(self.resolve(patient, &indicator.field), indicator.kind) {
                    affirmative[index][bucket] += 1;
                }
            }
        }

        let columns: Vec<String> = ranges
            .iter()
            .map(|range| range.label.clone())
            .chain(std::iter::once(no_data.to_string()))
            .collect();

        let mut cells: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        let mut max_percentage = 0.0f64;
        for (index, field) in rows.iter().enumerate() {
            let row = cells.entry(field.clone()).or_default();
            for (bucket, column) in columns.iter().enumerate() {
                let value = percentage(affirmative[index][bucket], sizes[bucket]);
                max_percentage = max_percentage.max(value);
                row.insert(column.clone(), value);
            }
        }

        let bucket_sizes = columns.iter().cloned().zip(sizes.iter().copied()).collect();

        debug!(
            rows = rows.len(),
            no_data = sizes[ranges.len()],
            max_percentage,
            "demographic cross-tab built"
        );

        DemographicCrossTab {
            rows,
            columns,
            cells,
            bucket_sizes,
            max_percentage,
            total_records: patients.len(),
        }
    }

    /// Index of the patient's bucket; `None` means no usable age data.
    ///
    /// Sources are tried in order: an already-bucketed label, a raw age,
    /// then an age computed from the birth date.
    fn assign_bucket(
        &self,
        patient: &Record,
        ranges: &[AgeRange],
        as_of: NaiveDate,
        sink: &dyn DiagnosticSink,
    ) -> Option<usize> {
        if let Some(label) = label_text(self.resolve(patient, AGE_RANGE_FIELD), AGE_RANGE_FIELD, sink) {
            match ranges
                .iter()
                .position(|range| range.label.eq_ignore_ascii_case(&label))
            {
                Some(index) => return Some(index),
                None => sink.emit(&Diagnostic::UnrecognizedAgeRange { value: label }),
            }
        }

        if let Some(age) = self.resolve(patient, AGE_FIELD).and_then(parse_age)
            && let Some(index) = bucket_for_age(ranges, age)
        {
            return Some(index);
        }

        let birth = label_text(self.resolve(patient, BIRTH_DATE_FIELD), BIRTH_DATE_FIELD, sink)?;
        match parse_date(&birth) {
            Some(date) => age_on(date, as_of).and_then(|age| bucket_for_age(ranges, age)),
            None => {
                sink.emit(&Diagnostic::UnparsedBirthDate { value: birth });
                None
            }
        }
    }
}

/// Ranges whose labels are unique (ASCII case-insensitive) and differ from
/// the no-data bucket. Later duplicates are dropped and reported.
fn distinct_age_ranges(
    ranges: &[AgeRange],
    no_data: &str,
    sink: &dyn DiagnosticSink,
) -> Vec<AgeRange> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(ranges.len());
    for range in ranges {
        let key = range.label.to_ascii_lowercase();
        if range.label.eq_ignore_ascii_case(no_data) || !seen.insert(key) {
            sink.emit(&Diagnostic::ConflictingAgeRange {
                label: range.label.clone(),
            });
            continue;
        }
        kept.push(range.clone());
    }
    kept
}

fn bucket_for_age(ranges: &[AgeRange], age: u32) -> Option<usize> {
    ranges.iter().position(|range| range.contains(age))
}

/// Whether an indicator value counts toward the numerator.
pub fn is_affirmative(value: Option<&Value>, kind: IndicatorKind) -> bool {
    let Some(value) = value else {
        return false;
    };
    match kind {
        IndicatorKind::Boolean => match value {
            Value::Bool(flag) => *flag,
            Value::String(text) => text.trim().eq_ignore_ascii_case("yes"),
            _ => false,
        },
        IndicatorKind::Demographic => matches!(scalar_text(value), ScalarText::Text(_)),
    }
}

/// Percent of `total`, rounded to one decimal; zero for an empty bucket.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Builds a demographic cross-tab with the default configuration, today's
/// date and `tracing` diagnostics.
pub fn build_demographic(
    patients: &[Record],
    indicators: &[Indicator],
    age_ranges: &[AgeRange],
) -> DemographicCrossTab {
    let request = DemographicRequest::new(indicators.to_vec()).with_age_ranges(age_ranges.to_vec());
    PivotEngine::default().build_demographic(patients, &request, &TracingSink)
}
