pub mod demographic;
pub mod error;
pub mod options;
pub mod record;
pub mod series;
pub mod table;

pub use demographic::{
    AgeRange, DemographicCrossTab, Indicator, IndicatorKind, NO_DATA_BUCKET, default_age_ranges,
    default_indicators,
};
pub use error::{PivotError, Result};
pub use options::{EngineConfig, SentinelPolicy, SynonymEntry};
pub use record::{Record, ScalarText, is_empty_like, records_from_value, scalar_text};
pub use series::{FlatRow, HeatmapPoint, HeatmapSeries, HierarchyNode, PieSlice, RankedEntry};
pub use table::{Cell, CrossTab, PivotStats};
