//! CLI module for rft-metrics
//!
//! This module provides the command-line interface, including:
//! - Argument parsing and configuration overrides (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{AggregateArgs, Cli, Commands, OutputArgs};
pub use setup::{init_logging, load_configuration, log_level};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
