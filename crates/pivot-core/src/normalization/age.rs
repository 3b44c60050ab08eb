//! Age derivation for demographic bucketing.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

/// Whole years between `birth` and `as_of`, one less when the birthday has
/// not yet come round in the `as_of` year.
///
/// Returns `None` when `birth` is after `as_of`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pivot_core::normalization::age::age_on;
///
/// let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
/// let before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
/// let on = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert_eq!(age_on(birth, before), Some(23));
/// assert_eq!(age_on(birth, on), Some(24));
/// ```
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    if birth > as_of {
        return None;
    }
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Reads a raw age from a number or numeric string.
///
/// Fractional ages are truncated; negative or non-finite values are rejected.
pub fn parse_age(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number < 0.0 || number > f64::from(u32::MAX) {
        return None;
    }
    Some(number.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leap_day_birthday() {
        let birth = NaiveDate::from_ymd_opt(2004, 2, 29).unwrap();
        let feb_28 = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        let mar_1 = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert_eq!(age_on(birth, feb_28), Some(18));
        assert_eq!(age_on(birth, mar_1), Some(19));
    }

    #[test]
    fn future_birth_date_has_no_age() {
        let birth = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(age_on(birth, today), None);
    }

    #[test]
    fn parse_age_accepts_numbers_and_strings() {
        assert_eq!(parse_age(&json!(42)), Some(42));
        assert_eq!(parse_age(&json!("19")), Some(19));
        assert_eq!(parse_age(&json!(30.7)), Some(30));
        assert_eq!(parse_age(&json!(-3)), None);
        assert_eq!(parse_age(&json!("adult")), None);
        assert_eq!(parse_age(&json!(true)), None);
    }
}
