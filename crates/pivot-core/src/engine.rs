//! Configured entry point shared by the aggregation paths.

use serde_json::Value;

use pivot_model::{EngineConfig, Record};

use crate::resolver::SynonymTable;

/// Pivot engine bound to one configuration.
///
/// The engine holds no per-call state; every aggregation allocates its own
/// working maps, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct PivotEngine {
    config: EngineConfig,
    synonyms: SynonymTable,
}

impl Default for PivotEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PivotEngine {
    pub fn new(config: EngineConfig) -> Self {
        let synonyms = SynonymTable::with_overrides(&config.synonyms);
        Self { config, synonyms }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Resolves a logical field through the configured synonym table.
    pub fn resolve<'r>(&self, record: &'r Record, field: &str) -> Option<&'r Value> {
        self.synonyms.resolve(record, field)
    }
}
