//! Rounding and rate helpers shared by every aggregator.
//!
//! All percentages in the aggregate document use the same rule: scale the
//! ratio to tenths of a percent, round half away from zero, divide back.
//! `f64::round` already rounds half away from zero.

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `part` in `whole`, one decimal. Zero when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// Complement of a one-decimal percentage, kept on the same decimal grid.
pub fn complement(pass_percentage: f64) -> f64 {
    round1(100.0 - pass_percentage)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
