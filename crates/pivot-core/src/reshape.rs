//! Reshape adapters: cross-tabulation to chart-ready record sequences.
//!
//! Adapters keep the table's row and column order. Only the ranked shapes
//! re-sort, and they do so stably so ties keep row order.

use pivot_model::{CrossTab, FlatRow, HeatmapPoint, HeatmapSeries, HierarchyNode, PieSlice, RankedEntry};

/// One series per row with one point per column; absent cells become zero.
pub fn to_heatmap_series(table: &CrossTab) -> Vec<HeatmapSeries> {
    table
        .rows
        .iter()
        .map(|row| HeatmapSeries {
            id: row.clone(),
            data: table
                .columns
                .iter()
                .map(|column| HeatmapPoint {
                    x: column.clone(),
                    y: table.count(row, column),
                })
                .collect(),
        })
        .collect()
}

/// Row totals, largest first.
pub fn to_ranked_list(table: &CrossTab) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = table
        .rows
        .iter()
        .map(|row| RankedEntry {
            id: row.clone(),
            value: table.row_total(row),
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// Ranked list for pie charts; rows without observations are left out.
pub fn to_pie_series(table: &CrossTab) -> Vec<PieSlice> {
    to_ranked_list(table)
        .into_iter()
        .filter(|entry| entry.value > 0)
        .map(|entry| PieSlice {
            label: entry.id.clone(),
            id: entry.id,
            value: entry.value,
        })
        .collect()
}

/// One group per row with positive cells nested as leaves.
pub fn to_hierarchy(table: &CrossTab) -> Vec<HierarchyNode> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let children: Vec<HierarchyNode> = table
                .columns
                .iter()
                .filter_map(|column| {
                    let count = table.count(row, column);
                    (count > 0).then(|| HierarchyNode::leaf(column.clone(), count))
                })
                .collect();
            (!children.is_empty()).then(|| HierarchyNode::group(row.clone(), children))
        })
        .collect()
}

/// Non-empty cells as flat export rows, in table order.
pub fn to_flat_rows(table: &CrossTab) -> Vec<FlatRow> {
    table
        .rows
        .iter()
        .flat_map(|row| {
            table.columns.iter().filter_map(move |column| {
                table.cell(row, column).map(|cell| FlatRow {
                    row: row.clone(),
                    column: column.clone(),
                    count: cell.count,
                    mentions: cell.mentions,
                })
            })
        })
        .collect()
}
