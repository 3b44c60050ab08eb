//! Cross-tabulation (pivot table) produced by the pivot builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate for one `(row, column)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Number of observations tabulated into this cell.
    pub count: u64,
    /// Observations in this cell that carried a mention identifier.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mentions: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Bookkeeping for one pivot call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotStats {
    /// Records supplied by the caller.
    pub input_records: usize,
    /// Records discarded by the categorical filter.
    pub filtered_out: usize,
    /// Records dropped because the column value was missing.
    pub dropped_missing_column: usize,
    /// Tabulated records whose row label was replaced by the sentinel.
    pub sentinel_rows: usize,
    /// Records that contributed to a cell.
    pub tabulated: usize,
}

/// Two-dimensional aggregation of counts keyed by `(row label, column label)`.
///
/// `rows` and `columns` hold every label that appears in `cells` and nothing
/// else. A pair with no entry in `cells` has a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    /// Logical field the rows were grouped by.
    pub row_field: String,
    /// Logical field the columns were grouped by.
    pub column_field: String,
    /// Row labels in display order.
    pub rows: Vec<String>,
    /// Column labels in display order.
    pub columns: Vec<String>,
    /// Non-empty cells, keyed by row then column.
    pub cells: BTreeMap<String, BTreeMap<String, Cell>>,
    #[serde(default)]
    pub stats: PivotStats,
}

impl CrossTab {
    /// Creates an empty table for the given fields.
    pub fn empty(row_field: impl Into<String>, column_field: impl Into<String>) -> Self {
        Self {
            row_field: row_field.into(),
            column_field: column_field.into(),
            ..Self::default()
        }
    }

    /// True when no record contributed; this is the "no data" signal.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<&Cell> {
        self.cells.get(row).and_then(|columns| columns.get(column))
    }

    /// Count for a pair, zero when the cell is absent.
    pub fn count(&self, row: &str, column: &str) -> u64 {
        self.cell(row, column).map_or(0, |cell| cell.count)
    }

    /// Sum of counts across all columns of a row.
    pub fn row_total(&self, row: &str) -> u64 {
        self.cells
            .get(row)
            .map_or(0, |columns| columns.values().map(|cell| cell.count).sum())
    }

    /// Sum of counts across all rows of a column.
    pub fn column_total(&self, column: &str) -> u64 {
        self.cells
            .values()
            .filter_map(|columns| columns.get(column))
            .map(|cell| cell.count)
            .sum()
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> u64 {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .map(|cell| cell.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrossTab {
        let mut table = CrossTab::empty("segment", "date");
        table.rows = vec!["Fatigue".to_string(), "Pain".to_string()];
        table.columns = vec!["1/2/24".to_string(), "1/3/24".to_string()];
        table
            .cells
            .entry("Pain".to_string())
            .or_default()
            .insert("1/2/24".to_string(), Cell { count: 2, mentions: 1 });
        table
            .cells
            .entry("Fatigue".to_string())
            .or_default()
            .insert("1/3/24".to_string(), Cell { count: 1, mentions: 0 });
        table
    }

    #[test]
    fn totals_sum_cells() {
        let table = sample();
        assert_eq!(table.total(), 3);
        assert_eq!(table.row_total("Pain"), 2);
        assert_eq!(table.column_total("1/3/24"), 1);
        assert_eq!(table.count("Pain", "1/3/24"), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn serializes_verbatim() {
        let table = sample();
        insta::assert_json_snapshot!(table.cells, @r#"
        {
          "Fatigue": {
            "1/3/24": {
              "count": 1
            }
          },
          "Pain": {
            "1/2/24": {
              "count": 2,
              "mentions": 1
            }
          }
        }
        "#);
    }
}
