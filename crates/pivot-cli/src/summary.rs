use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pivot_model::{
    CrossTab, DemographicCrossTab, FlatRow, HeatmapSeries, HierarchyNode, PieSlice, PivotStats,
    RankedEntry,
};

const TOTAL_LABEL: &str = "Total";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

/// Render the cross-tab with row and column totals.
pub fn cross_tab_table(table: &CrossTab) -> Table {
    let mut out = Table::new();
    let mut header = vec![header_cell(&table.row_field)];
    header.extend(table.columns.iter().map(|column| header_cell(column)));
    header.push(header_cell(TOTAL_LABEL));
    out.set_header(header);
    apply_table_style(&mut out);
    for index in 1..=table.columns.len() + 1 {
        align_column(&mut out, index, CellAlignment::Right);
    }
    for row in &table.rows {
        let mut cells = vec![Cell::new(row).add_attribute(Attribute::Bold)];
        cells.extend(
            table
                .columns
                .iter()
                .map(|column| count_cell(table.count(row, column))),
        );
        cells.push(Cell::new(table.row_total(row)).add_attribute(Attribute::Bold));
        out.add_row(cells);
    }
    let mut totals = vec![total_label_cell()];
    totals.extend(
        table
            .columns
            .iter()
            .map(|column| Cell::new(table.column_total(column)).add_attribute(Attribute::Bold)),
    );
    totals.push(
        Cell::new(table.total())
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    );
    out.add_row(totals);
    out
}

/// Heatmap series laid out as a grid (series down, x values across).
pub fn heatmap_table(series: &[HeatmapSeries]) -> Table {
    let mut out = Table::new();
    let mut header = vec![header_cell("Series")];
    if let Some(first) = series.first() {
        header.extend(first.data.iter().map(|point| header_cell(&point.x)));
    }
    out.set_header(header);
    apply_table_style(&mut out);
    for entry in series {
        let mut cells = vec![Cell::new(&entry.id).add_attribute(Attribute::Bold)];
        cells.extend(entry.data.iter().map(|point| count_cell(point.y)));
        out.add_row(cells);
    }
    out
}

pub fn ranked_table(entries: &[RankedEntry]) -> Table {
    let mut out = Table::new();
    out.set_header(vec![header_cell("#"), header_cell("Label"), header_cell("Count")]);
    apply_table_style(&mut out);
    align_column(&mut out, 0, CellAlignment::Right);
    align_column(&mut out, 2, CellAlignment::Right);
    for (rank, entry) in entries.iter().enumerate() {
        out.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&entry.id),
            count_cell(entry.value),
        ]);
    }
    out
}

pub fn pie_table(slices: &[PieSlice]) -> Table {
    let total: u64 = slices.iter().map(|slice| slice.value).sum();
    let mut out = Table::new();
    out.set_header(vec![header_cell("Label"), header_cell("Count"), header_cell("Share")]);
    apply_table_style(&mut out);
    align_column(&mut out, 1, CellAlignment::Right);
    align_column(&mut out, 2, CellAlignment::Right);
    for slice in slices {
        let share = if total == 0 {
            0.0
        } else {
            slice.value as f64 / total as f64 * 100.0
        };
        out.add_row(vec![
            Cell::new(&slice.label),
            count_cell(slice.value),
            Cell::new(format!("{share:.1}%")),
        ]);
    }
    out
}

/// Nested groups flattened with indentation.
pub fn hierarchy_table(nodes: &[HierarchyNode]) -> Table {
    let mut out = Table::new();
    out.set_header(vec![header_cell("Name"), header_cell("Count")]);
    apply_table_style(&mut out);
    align_column(&mut out, 1, CellAlignment::Right);
    for node in nodes {
        push_hierarchy_rows(&mut out, node, 0);
    }
    out
}

fn push_hierarchy_rows(out: &mut Table, node: &HierarchyNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.children.is_empty() {
        out.add_row(vec![
            Cell::new(format!("{indent}{}", node.name)),
            count_cell(node.total()),
        ]);
        return;
    }
    out.add_row(vec![
        Cell::new(format!("{indent}{}", node.name)).add_attribute(Attribute::Bold),
        Cell::new(node.total()).add_attribute(Attribute::Bold),
    ]);
    for child in &node.children {
        push_hierarchy_rows(out, child, depth + 1);
    }
}

pub fn flat_table(rows: &[FlatRow], row_field: &str, column_field: &str) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell(row_field),
        header_cell(column_field),
        header_cell("Count"),
        header_cell("Mentions"),
    ]);
    apply_table_style(&mut out);
    align_column(&mut out, 2, CellAlignment::Right);
    align_column(&mut out, 3, CellAlignment::Right);
    for row in rows {
        out.add_row(vec![
            Cell::new(&row.row),
            Cell::new(&row.column),
            count_cell(row.count),
            count_cell(row.mentions),
        ]);
    }
    out
}

/// Percentages per indicator and age bucket, with bucket sizes as a footer.
/// The largest percentage is highlighted.
pub fn demographic_table(table: &DemographicCrossTab) -> Table {
    let mut out = Table::new();
    let mut header = vec![header_cell("Indicator")];
    header.extend(table.columns.iter().map(|column| header_cell(column)));
    out.set_header(header);
    apply_table_style(&mut out);
    for index in 1..=table.columns.len() {
        align_column(&mut out, index, CellAlignment::Right);
    }
    for row in &table.rows {
        let mut cells = vec![Cell::new(row).add_attribute(Attribute::Bold)];
        cells.extend(table.columns.iter().map(|column| {
            percentage_cell(table.percentage(row, column), table.max_percentage)
        }));
        out.add_row(cells);
    }
    let mut sizes = vec![total_label_cell()];
    sizes.extend(table.columns.iter().map(|column| {
        let size = table.bucket_sizes.get(column).copied().unwrap_or_default();
        Cell::new(size).add_attribute(Attribute::Bold)
    }));
    out.add_row(sizes);
    out
}

/// Logical fields and the keys they resolve from, in lookup order.
pub fn fields_table<'a, I>(entries: I) -> Table
where
    I: IntoIterator<Item = (&'a str, &'a [String])>,
{
    let mut out = Table::new();
    out.set_header(vec![header_cell("Field"), header_cell("Aliases")]);
    apply_table_style(&mut out);
    for (field, aliases) in entries {
        let aliases = if aliases.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(aliases.join(", "))
        };
        out.add_row(vec![Cell::new(field).fg(Color::Blue), aliases]);
    }
    out
}

pub fn print_stats(stats: &PivotStats) {
    eprintln!(
        "Records: {} read, {} filtered out, {} without column value, {} sentinel rows, {} tabulated",
        stats.input_records,
        stats.filtered_out,
        stats.dropped_missing_column,
        stats.sentinel_rows,
        stats.tabulated
    );
}

fn percentage_cell(value: f64, max: f64) -> Cell {
    let cell = Cell::new(format!("{value:.1}%"));
    if value == 0.0 {
        cell.fg(Color::DarkGrey)
    } else if value >= max {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn count_cell(count: u64) -> Cell {
    if count == 0 {
        dim_cell("-")
    } else {
        Cell::new(count)
    }
}

fn total_label_cell() -> Cell {
    Cell::new(TOTAL_LABEL)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
