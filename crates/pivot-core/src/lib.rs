//! Pivot aggregation engine for clinical observation records.
//!
//! This crate turns flat record collections into cross-tabulations and
//! chart-ready series:
//!
//! - **resolver**: logical field lookup across key spellings
//! - **normalization**: date canonicalization, label cleanup, age derivation
//! - **pivot**: row × column count tables over observation records
//! - **reshape**: heatmap, ranked, pie, hierarchy and flat-row adapters
//! - **demographic**: indicator-by-age-range percentages over patient records
//! - **diagnostics**: pluggable sinks for degraded-input reports
//!
//! Every entry point is a pure function of its arguments; there is no I/O,
//! no caching and no shared mutable state.

pub mod demographic;
pub mod diagnostics;
pub mod engine;
pub mod normalization;
pub mod pivot;
pub mod reshape;
pub mod resolver;

pub use demographic::{DemographicRequest, build_demographic};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use engine::PivotEngine;
pub use normalization::datetime::{CanonicalDate, canonicalize};
pub use pivot::{CategoryFilter, PivotRequest, build_pivot};
pub use reshape::{to_flat_rows, to_heatmap_series, to_hierarchy, to_pie_series, to_ranked_list};
pub use resolver::{SynonymTable, resolve};
