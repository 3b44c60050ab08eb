//! CLI library components for the pivot engine front end.

pub mod input;
pub mod logging;
