//! Pivot builder: observation records to a row × column count table.
//!
//! Policy for degraded input:
//! - a record without a column value is dropped
//! - a record without a row value is tabulated under the row field's sentinel
//! - every column value goes through date canonicalization; a value that is
//!   not a date passes through and sorts after recognized dates
//!
//! Nothing here fails. The only "no data" signal is an empty `rows`.

use std::collections::BTreeMap;

use tracing::{debug, debug_span};

use pivot_model::{Cell, CrossTab, PivotStats, Record};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::engine::PivotEngine;
use crate::normalization::datetime::{DateSortKey, canonicalize, canonicalize_reported};
use crate::normalization::labels::{label_text, strip_label_prefix};

/// Logical field holding an optional mention identifier.
pub const MENTION_FIELD: &str = "mention_id";

/// Keeps only records whose discriminator equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Field to compare; `None` uses the configured discriminator field.
    pub field: Option<String>,
    pub value: String,
}

impl CategoryFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            value: value.into(),
        }
    }

    /// Filter on the configured discriminator (`event_type` by default),
    /// e.g. `"symptom"` or `"problem"`.
    pub fn event_type(value: impl Into<String>) -> Self {
        Self {
            field: None,
            value: value.into(),
        }
    }

    /// Trimmed, ASCII case-insensitive equality. An absent value never
    /// matches.
    pub fn matches(&self, actual: Option<&str>) -> bool {
        actual.is_some_and(|actual| actual.trim().eq_ignore_ascii_case(self.value.trim()))
    }
}

/// Arguments for one pivot call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRequest {
    pub row_field: String,
    pub column_field: String,
    pub filter: Option<CategoryFilter>,
}

impl PivotRequest {
    pub fn new(row_field: impl Into<String>, column_field: impl Into<String>) -> Self {
        Self {
            row_field: row_field.into(),
            column_field: column_field.into(),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl PivotEngine {
    /// Builds a cross-tabulation of `records`.
    ///
    /// Output is fully determined by the inputs: labels are ordered by
    /// explicit sort rules, never by container iteration order.
    pub fn build(
        &self,
        records: &[Record],
        request: &PivotRequest,
        sink: &dyn DiagnosticSink,
    ) -> CrossTab {
        let row_field = request.row_field.as_str();
        let column_field = request.column_field.as_str();
        let span = debug_span!("pivot", row_field, column_field, records = records.len());
        let _guard = span.enter();

        let config = self.config();
        let sentinel = config.sentinels.label_for(row_field);
        let report_unparsed = config.is_date_field(column_field);
        let discriminator = request
            .filter
            .as_ref()
            .and_then(|filter| filter.field.as_deref())
            .unwrap_or(config.discriminator_field.as_str());

        let mut cells: BTreeMap<String, BTreeMap<String, Cell>> = BTreeMap::new();
        let mut column_keys: BTreeMap<String, DateSortKey> = BTreeMap::new();
        let mut stats = PivotStats {
            input_records: records.len(),
            ..PivotStats::default()
        };
        let mut considered = 0usize;
        let mut row_resolved = false;
        let mut column_resolved = false;

        for record in records {
            if let Some(filter) = &request.filter {
                let actual = label_text(self.resolve(record, discriminator), discriminator, sink);
                if !filter.matches(actual.as_deref()) {
                    stats.filtered_out += 1;
                    continue;
                }
            }
            considered += 1;

            let column_value = self.resolve(record, column_field);
            column_resolved |= column_value.is_some();
            let Some(column_text) = label_text(column_value, column_field, sink) else {
                stats.dropped_missing_column += 1;
                continue;
            };
            // Only declared date fields report values that fail to parse.
            let canonical = if report_unparsed {
                canonicalize_reported(&column_text, column_field, sink)
            } else {
                canonicalize(&column_text)
            };
            let key = canonical.sort_key();
            column_keys
                .entry(canonical.display.clone())
                .and_modify(|existing| {
                    if key < *existing {
                        *existing = key.clone();
                    }
                })
                .or_insert(key);
            let column_label = canonical.display;

            let row_value = self.resolve(record, row_field);
            row_resolved |= row_value.is_some();
            let row_label = label_text(row_value, row_field, sink)
                .and_then(|label| strip_label_prefix(&label, &config.label_prefixes))
                .unwrap_or_else(|| {
                    stats.sentinel_rows += 1;
                    sentinel.to_string()
                });

            let has_mention = label_text(self.resolve(record, MENTION_FIELD), MENTION_FIELD, sink)
                .is_some();
            let cell = cells
                .entry(row_label)
                .or_default()
                .entry(column_label)
                .or_default();
            cell.count += 1;
            if has_mention {
                cell.mentions += 1;
            }
            stats.tabulated += 1;
        }

        if considered > 0 {
            for (field, resolved) in [(row_field, row_resolved), (column_field, column_resolved)] {
                if !resolved {
                    sink.emit(&Diagnostic::UnresolvedField {
                        field: field.to_string(),
                        records: considered,
                    });
                }
            }
        }

        let rows = order_rows(
            cells.keys(),
            &[sentinel, config.sentinels.default_label.as_str()],
        );
        let columns = order_columns(column_keys);

        debug!(
            rows = rows.len(),
            columns = columns.len(),
            tabulated = stats.tabulated,
            filtered_out = stats.filtered_out,
            dropped_missing_column = stats.dropped_missing_column,
            sentinel_rows = stats.sentinel_rows,
            "pivot built"
        );

        CrossTab {
            row_field: row_field.to_string(),
            column_field: column_field.to_string(),
            rows,
            columns,
            cells,
            stats,
        }
    }
}

/// Lexicographic order with sentinel labels moved to the end.
fn order_rows<'a>(labels: impl Iterator<Item = &'a String>, sentinels: &[&str]) -> Vec<String> {
    let (mut tail, mut rows): (Vec<String>, Vec<String>) = labels
        .cloned()
        .partition(|label| sentinels.contains(&label.as_str()));
    rows.sort();
    tail.sort();
    rows.extend(tail);
    rows
}

/// Recognized dates chronologically, then every other label lexicographically.
fn order_columns(keys: BTreeMap<String, DateSortKey>) -> Vec<String> {
    let mut columns: Vec<(DateSortKey, String)> =
        keys.into_iter().map(|(label, key)| (key, label)).collect();
    columns.sort();
    columns.into_iter().map(|(_, label)| label).collect()
}

/// Builds a pivot with the default configuration, reporting through
/// `tracing`.
///
/// `filter` compares against the `event_type` discriminator.
pub fn build_pivot(
    records: &[Record],
    row_field: &str,
    column_field: &str,
    filter: Option<&str>,
) -> CrossTab {
    let mut request = PivotRequest::new(row_field, column_field);
    if let Some(value) = filter {
        request = request.with_filter(CategoryFilter::event_type(value));
    }
    PivotEngine::default().build(records, &request, &TracingSink)
}
