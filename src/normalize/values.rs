//! Permissive coercion of spreadsheet cell values.
//!
//! Decoded spreadsheets hand back strings, numbers, booleans and nulls more
//! or less at random for the same column. These helpers never fail; a value
//! that cannot be read as the requested type is `None`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Cell values that mark a row as failed.
const FAILING_VALUES: &[&str] = &["yes", "fail", "failed", "true"];

/// Date formats tried in order. Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Largest serial day number a spreadsheet can hold (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Trimmed, non-empty text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Finite number from a JSON number or numeric string.
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Calendar date from a date string, date-time string or serial day number.
pub fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => n.as_f64().and_then(serial_date),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

/// True when the cell carries one of the failing indicator values.
pub fn is_failure(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            FAILING_VALUES.contains(&lowered.as_str())
        }
        _ => false,
    }
}

/// Spreadsheet serial day (1900 date system, epoch 1899-12-30).
pub fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    // numeric strings exported from a sheet without date formatting
    s.parse::<f64>().ok().and_then(serial_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_text_trims_and_rejects_empty() {
        assert_eq!(text(&json!("  Packaging ")), Some("Packaging".to_string()));
        assert_eq!(text(&json!("   ")), None);
        assert_eq!(text(&json!(null)), None);
        assert_eq!(text(&json!(42)), Some("42".to_string()));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(&json!(3.5)), Some(3.5));
        assert_eq!(number(&json!(" 2.25 ")), Some(2.25));
        assert_eq!(number(&json!("n/a")), None);
        assert_eq!(number(&json!(true)), None);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(date(&json!("2024-01-20")), Some(ymd(2024, 1, 20)));
        assert_eq!(date(&json!("2024/03/05")), Some(ymd(2024, 3, 5)));
        assert_eq!(date(&json!("03/05/2024")), Some(ymd(2024, 3, 5)));
        assert_eq!(date(&json!("05.03.2024")), Some(ymd(2024, 3, 5)));
        assert_eq!(date(&json!("20-Jan-2024")), Some(ymd(2024, 1, 20)));
        assert_eq!(date(&json!("Jan 20, 2024")), Some(ymd(2024, 1, 20)));
        assert_eq!(date(&json!("2024-01-20T08:30:00Z")), Some(ymd(2024, 1, 20)));
        assert_eq!(date(&json!("2024-01-20 08:30:00")), Some(ymd(2024, 1, 20)));
    }

    #[test]
    fn test_serial_dates() {
        // 45306 is 2024-01-15 in the 1900 date system
        assert_eq!(date(&json!(45306)), Some(ymd(2024, 1, 15)));
        assert_eq!(date(&json!("45306")), Some(ymd(2024, 1, 15)));
        assert_eq!(date(&json!(-3)), None);
    }

    #[test]
    fn test_unparseable_dates_are_none() {
        assert_eq!(date(&json!("sometime in spring")), None);
        assert_eq!(date(&json!("")), None);
        assert_eq!(date(&json!(null)), None);
    }

    #[test]
    fn test_failure_values() {
        assert!(is_failure(&json!("Yes")));
        assert!(is_failure(&json!("FAIL")));
        assert!(is_failure(&json!("Failed")));
        assert!(is_failure(&json!(true)));
        assert!(!is_failure(&json!("Pass")));
        assert!(!is_failure(&json!("No")));
        assert!(!is_failure(&json!(1)));
    }
}
