//! Retry configuration for artifact retrieval.
//!
//! Readers fetch the aggregate document from storage that may be mid-write
//! or briefly unavailable. Failed fetches are retried with a growing delay
//! before the reader gives up on the primary location.
//!
//! # Configuration Example
//!
//! ```toml
//! [retry]
//! enabled = true
//! max_retries = 2
//! base_delay_ms = 1000
//! strategy = "exponential"
//! multiplier = 1.5
//! timeout_seconds = 30
//! ```
//!
//! # Retry Strategies
//!
//! - **Constant**: Same delay between each retry
//! - **Linear**: Delay increases linearly (base * attempt)
//! - **Exponential**: Delay grows geometrically (base * multiplier^(attempt-1))

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for artifact retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Enable automatic retries (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum number of retry attempts after the first try (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds (default: 1000)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Retry strategy (default: exponential)
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Growth factor for the exponential strategy (default: 1.5)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum total time to spend retrying in seconds (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            multiplier: default_multiplier(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl RetryConfig {
    /// Create a retry config with retries disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Get the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Calculate the delay before a specific retry attempt.
    ///
    /// The attempt number is 1-indexed (first retry is attempt 1).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay_ms as f64;
        let attempt = attempt.max(1);

        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base_ms,
            RetryStrategy::Linear => base_ms * (attempt as f64),
            RetryStrategy::Exponential => base_ms * self.multiplier.powi(attempt as i32 - 1),
        };

        // Cap at timeout
        let max_delay = self.timeout_seconds.saturating_mul(1000) as f64;
        Duration::from_millis(delay_ms.clamp(0.0, max_delay) as u64)
    }

    /// Check if retries should continue based on attempt count and elapsed time.
    pub fn should_retry(&self, attempt: u32, elapsed: Duration) -> bool {
        if !self.enabled {
            return false;
        }
        attempt < self.max_retries && elapsed < self.timeout()
    }
}

/// Retry delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    /// Same delay between each retry.
    Constant,
    /// Delay increases linearly: base * attempt.
    Linear,
    /// Delay grows geometrically: base * multiplier^(attempt-1).
    #[default]
    Exponential,
}

// Default value functions for serde
fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_multiplier() -> f64 {
    1.5
}

fn default_timeout_seconds() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.strategy, RetryStrategy::Exponential);
        assert_eq!(config.timeout_seconds, 30);
        assert!((config.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retry_config_disabled() {
        let config = RetryConfig::disabled();
        assert!(!config.enabled);
        assert!(!config.should_retry(0, Duration::ZERO));
    }

    #[test]
    fn test_exponential_delay_grows_by_multiplier() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(1500));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(2250));
    }

    #[test]
    fn test_constant_and_linear_delays() {
        let constant = RetryConfig {
            strategy: RetryStrategy::Constant,
            base_delay_ms: 200,
            ..Default::default()
        };
        assert_eq!(constant.delay_for_attempt(3), Duration::from_millis(200));

        let linear = RetryConfig {
            strategy: RetryStrategy::Linear,
            base_delay_ms: 200,
            ..Default::default()
        };
        assert_eq!(linear.delay_for_attempt(3), Duration::from_millis(600));
    }

    #[test]
    fn test_delay_capped_at_timeout() {
        let config = RetryConfig {
            base_delay_ms: 10_000,
            multiplier: 10.0,
            timeout_seconds: 5,
            ..Default::default()
        };
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(5));
    }

    #[test]
    fn test_huge_timeout_does_not_overflow_cap() {
        let constant = RetryConfig {
            strategy: RetryStrategy::Constant,
            base_delay_ms: 200,
            timeout_seconds: u64::MAX,
            ..Default::default()
        };
        assert_eq!(constant.delay_for_attempt(1), Duration::from_millis(200));

        let runaway = RetryConfig {
            base_delay_ms: 200,
            multiplier: 1e6,
            timeout_seconds: u64::MAX,
            ..Default::default()
        };
        assert_eq!(runaway.delay_for_attempt(5), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_should_retry_respects_limits() {
        let config = RetryConfig::default();
        assert!(config.should_retry(0, Duration::from_secs(1)));
        assert!(config.should_retry(1, Duration::from_secs(1)));
        assert!(!config.should_retry(2, Duration::from_secs(1)));
        assert!(!config.should_retry(0, Duration::from_secs(31)));
    }

    #[test]
    fn test_parse_from_toml() {
        let config: RetryConfig = toml::from_str(
            r#"
max_retries = 4
strategy = "linear"
"#,
        )
        .unwrap();
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.strategy, RetryStrategy::Linear);
        assert_eq!(config.base_delay_ms, 1000);
    }
}
