//! CLI command implementations for rft-metrics.
//!
//! Available commands:
//! - **aggregate**: Load the source workbooks and publish the metrics document
//! - **init**: Initialize a new rft-metrics configuration file
//! - **status**: Report which sources and artifacts exist and parse
//! - **show**: Read the published document and print its overview

pub mod aggregate;
pub mod init;
pub mod show;
pub mod status;

pub use aggregate::handle_aggregate;
pub use init::init_config;
pub use show::handle_show;
pub use status::{collect_status, handle_status, FileCheck};
