//! Value normalization used by the aggregation paths.
//!
//! - **datetime**: date canonicalization to `M/D/YY` and chronological ordering
//! - **labels**: category label extraction and prefix stripping
//! - **age**: age derivation from raw ages and birth dates

pub mod age;
pub mod datetime;
pub mod labels;

pub use age::{age_on, parse_age};
pub use datetime::{
    CanonicalDate, DateSortKey, canonicalize, canonicalize_reported, compare_date_labels,
    format_display_date, parse_date,
};
pub use labels::{label_text, strip_label_prefix};
