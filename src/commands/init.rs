use crate::config::{parse_and_validate_config, CONFIG_FILE_NAME};
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# rft-metrics configuration

[sources]
internal = "data/internal.json"
external = "data/external.json"
process = "data/process.json"

[output]
dir = "public"
primary = "data/complete-data.json"
fallback = "complete-data.json"
metadata = "data/metadata.json"
pretty = true

[analysis]
months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
issue_distribution_top = 5
form_error_top = 5
trend_series = 3
default_cycle_target = 18.0
# seed = 42

[retry]
enabled = true
max_retries = 2
base_delay_ms = 1000
strategy = "exponential"
multiplier = 1.5
timeout_seconds = 30
"#;

/// Write the default configuration into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(&std::env::current_dir()?, force)
}

/// Parsed form of [`DEFAULT_CONFIG`].
pub fn default_config() -> Result<crate::config::RftConfig> {
    parse_and_validate_config(DEFAULT_CONFIG)
}
