//! Runtime setup for the CLI: logging and configuration resolution.

use anyhow::Result;
use std::path::Path;

use crate::config::{resolve_config, RftConfig};

/// Map `-v` count to a default log filter.
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global logger once. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbosity: u8) {
    let env = env_logger::Env::default().default_filter_or(log_level(verbosity));
    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
    {
        // Already initialized - this is fine, just ignore
        eprintln!("Note: Logger already configured: {}", e);
    }
}

/// Load configuration from an explicit file or by discovery.
pub fn load_configuration(explicit: Option<&Path>) -> Result<RftConfig> {
    let config = resolve_config(explicit)?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_by_verbosity() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(7), "trace");
    }
}
