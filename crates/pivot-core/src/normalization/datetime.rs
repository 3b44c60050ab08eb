//! Date canonicalization for pivot columns.
//!
//! Observation dates arrive as ISO 8601 timestamps, US slash dates with two-
//! or four-digit years, or plain `YYYY-MM-DD`. Every recognized value is
//! rendered as `M/D/YY` so the same calendar day always lands in the same
//! column. Anything else passes through unchanged and sorts after all
//! recognized dates.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// A date value after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDate {
    /// `M/D/YY` for recognized dates, the trimmed input otherwise.
    pub display: String,
    /// Calendar date when the input was recognized.
    pub date: Option<NaiveDate>,
}

impl CanonicalDate {
    pub fn is_parsed(&self) -> bool {
        self.date.is_some()
    }

    pub fn sort_key(&self) -> DateSortKey {
        match self.date {
            Some(date) => DateSortKey::Parsed(date),
            None => DateSortKey::Unparsed(self.display.clone()),
        }
    }
}

/// Ordering for date columns: recognized dates chronologically, then
/// unrecognized values lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateSortKey {
    Parsed(NaiveDate),
    Unparsed(String),
}

/// Compares two display labels as date columns.
pub fn compare_date_labels(a: &str, b: &str) -> Ordering {
    canonicalize(a)
        .sort_key()
        .cmp(&canonicalize(b).sort_key())
        .then_with(|| a.cmp(b))
}

/// Canonicalizes a raw date value.
pub fn canonicalize(raw: &str) -> CanonicalDate {
    let trimmed = raw.trim();
    match parse_date(trimmed) {
        Some(date) => CanonicalDate {
            display: format_display_date(date),
            date: Some(date),
        },
        None => CanonicalDate {
            display: trimmed.to_string(),
            date: None,
        },
    }
}

/// Canonicalizes a raw date value, reporting pass-through values.
pub fn canonicalize_reported(raw: &str, field: &str, sink: &dyn DiagnosticSink) -> CanonicalDate {
    let canonical = canonicalize(raw);
    if !canonical.is_parsed() {
        sink.emit(&Diagnostic::UnparsedDate {
            field: field.to_string(),
            value: canonical.display.clone(),
        });
    }
    canonical
}

/// Formats a date as `M/D/YY` without zero padding on month and day.
pub fn format_display_date(date: NaiveDate) -> String {
    format!(
        "{}/{}/{:02}",
        date.month(),
        date.day(),
        date.year().rem_euclid(100)
    )
}

/// Parses a date in any recognized input format.
///
/// Formats are tried in order: ISO 8601 timestamp with a time component,
/// `M/D/YYYY`, `M/D/YY` (read as 20YY), `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_timestamp(trimmed)
        .or_else(|| try_parse_slash_date(trimmed, 4))
        .or_else(|| try_parse_slash_date(trimmed, 2))
        .or_else(|| try_parse_iso_date(trimmed))
}

/// ISO 8601 timestamp. The calendar date written in the string is used,
/// whatever the offset.
fn try_parse_timestamp(value: &str) -> Option<NaiveDate> {
    if !has_iso_date_prefix(value) || value.len() <= 10 {
        return None;
    }
    if !matches!(value.as_bytes()[10], b'T' | b' ') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];
    for fmt in &offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.date_naive());
        }
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// `M/D/YYYY` or `M/D/YY`, selected by `year_digits`.
fn try_parse_slash_date(value: &str, year_digits: usize) -> Option<NaiveDate> {
    let mut parts = value.split('/');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if !is_digits(month, 1, 2) || !is_digits(day, 1, 2) || !is_digits(year, year_digits, year_digits)
    {
        return None;
    }
    let mut year: i32 = year.parse().ok()?;
    if year_digits == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Plain `YYYY-MM-DD`.
fn try_parse_iso_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if !is_digits(year, 4, 4) || !is_digits(month, 1, 2) || !is_digits(day, 1, 2) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn has_iso_date_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
