//! Validation with error accumulation for configuration.
//!
//! Checks return stillwater's `Validation` so every problem is collected
//! instead of stopping at the first one. A user fixing `.rft-metrics.toml`
//! sees the whole list in one run.

use std::fmt;

use stillwater::{NonEmptyVec, Validation};

use super::core::{AnalysisSettings, RftConfig};

/// One invalid setting, addressed by its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result with field context for structured error reporting.
pub type FieldValidation<T> = Validation<T, NonEmptyVec<FieldError>>;

/// All validation failures of one configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid configuration: {}", join(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AnalysisSettings {
    /// Check every analysis setting, accumulating all errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_validation(validate_analysis(self))
    }
}

impl RftConfig {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_validation(validate_config(self))
    }
}

/// Validate the entire config, accumulating ALL errors.
pub fn validate_config(config: &RftConfig) -> FieldValidation<()> {
    combine_validations(vec![
        validate_analysis(&config.analysis),
        check(
            config.retry.multiplier > 0.0,
            "retry.multiplier",
            format!("must be positive, got {}", config.retry.multiplier),
        ),
    ])
}

/// Pure function validating every analysis setting
pub fn validate_analysis(settings: &AnalysisSettings) -> FieldValidation<()> {
    let mut validations = vec![check(
        !settings.months.is_empty(),
        "analysis.months",
        "at least one month is required",
    )];
    validations.extend(settings.months.iter().map(|label| {
        check(
            label.trim().parse::<chrono::Month>().is_ok(),
            "analysis.months",
            format!("'{}' is not a month name", label),
        )
    }));
    validations.extend(
        [
            ("analysis.issue_distribution_top", settings.issue_distribution_top),
            ("analysis.form_error_top", settings.form_error_top),
            ("analysis.trend_series", settings.trend_series),
        ]
        .into_iter()
        .map(|(field, value)| check(value > 0, field, "must be at least 1")),
    );
    // NaN fails the comparison and is rejected with the negatives
    validations.push(check(
        settings.default_cycle_target > 0.0,
        "analysis.default_cycle_target",
        format!("must be positive, got {}", settings.default_cycle_target),
    ));

    combine_validations(validations)
}

fn check(ok: bool, field: &str, message: impl Into<String>) -> FieldValidation<()> {
    if ok {
        Validation::Success(())
    } else {
        Validation::Failure(NonEmptyVec::new(FieldError::new(field, message), Vec::new()))
    }
}

/// Combine validations, keeping every error in order.
pub fn combine_validations(validations: Vec<FieldValidation<()>>) -> FieldValidation<()> {
    let mut failures: Vec<FieldError> = Vec::new();
    for v in validations {
        if let Validation::Failure(errors) = v {
            failures.extend(errors.into_vec());
        }
    }

    match NonEmptyVec::from_vec(failures) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// Result API over a validation.
pub fn run_validation<T>(validation: FieldValidation<T>) -> Result<T, ValidationErrors> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(ValidationErrors(errors.into_vec())),
    }
}
