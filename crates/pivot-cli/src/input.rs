//! Record loading for the CLI: JSON arrays and CSV files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde_json::Value;
use tracing::info;

use pivot_model::{Record, records_from_value};

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// `.csv` (any case) selects CSV; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Load records from `path`, choosing the reader by file extension.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let records = match InputFormat::from_path(path) {
        InputFormat::Json => read_json_records(path)?,
        InputFormat::Csv => read_csv_records(path)?,
    };
    info!(path = %path.display(), records = records.len(), "loaded input");
    Ok(records)
}

/// Read a JSON array of objects.
pub fn read_json_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parse json: {}", path.display()))?;
    records_from_value(value).with_context(|| format!("load records: {}", path.display()))
}

/// Read a CSV file with a header row. Every cell becomes a string value;
/// header BOMs and surrounding whitespace are stripped.
pub fn read_csv_records(path: &Path) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("read record: {}", path.display()))?;
        let mut record = Record::new();
        for (key, value) in headers.iter().zip(row.iter()) {
            if key.is_empty() {
                continue;
            }
            record.insert(key.clone(), Value::String(value.trim().to_string()));
        }
        records.push(record);
    }
    Ok(records)
}
