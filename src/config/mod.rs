//! Layered configuration: `.rft-metrics.toml` plus command-line overrides.

mod core;
mod loader;
pub mod retry;
pub mod validation;

pub use self::core::{AnalysisSettings, OutputConfig, RftConfig, SourcesConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, resolve_config, CONFIG_FILE_NAME,
};
pub use retry::{RetryConfig, RetryStrategy};
pub use validation::{
    run_validation, validate_analysis, validate_config, FieldError, FieldValidation,
    ValidationErrors,
};
