//! Chart-ready record shapes produced by the reshape adapters.
//!
//! These are the only contract with the presentation layer. Every shape is
//! flat enough for naive tabular serialization apart from the documented
//! nesting (`data` on heatmap series, `children` on hierarchy nodes).

use serde::{Deserialize, Serialize};

/// One point of a heatmap series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: String,
    pub y: u64,
}

/// One heatmap row: `{ id, data: [{ x, y }, ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSeries {
    pub id: String,
    pub data: Vec<HeatmapPoint>,
}

/// Bar chart entry: a row label with its total across columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: String,
    pub value: u64,
}

/// Pie chart slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    pub id: String,
    pub label: String,
    pub value: u64,
}

/// Bubble chart node. Leaves carry a `value`; groups carry `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    /// Wraps row groups under a single root for renderers that need one.
    pub fn root(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self::group(name, children)
    }

    /// Sum of leaf values below (and including) this node.
    pub fn total(&self) -> u64 {
        self.value.unwrap_or(0) + self.children.iter().map(HierarchyNode::total).sum::<u64>()
    }
}

/// One non-empty cell as a flat export row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    pub row: String,
    pub column: String,
    pub count: u64,
    pub mentions: u64,
}
