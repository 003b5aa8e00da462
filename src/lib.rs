//! Right-First-Time quality metrics.
//!
//! Decoded spreadsheet exports (internal quality records, external customer
//! records, commercial process records) are normalized into canonical
//! records, aggregated into a single [`AggregateDocument`], and published
//! as JSON artifacts for dashboard readers.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod normalize;
pub mod overview;
pub mod pipeline;
pub mod reader;
pub mod synth;
pub mod tally;

pub use crate::aggregate::AggregationContext;
pub use crate::config::RftConfig;
pub use crate::core::{AggregateDocument, AnalysisStatus, SourceKind};
pub use crate::errors::{FetchError, OutputError, SourceError};
pub use crate::normalize::Workbook;
pub use crate::pipeline::{run, PipelineInputs, PipelineRun};
pub use crate::reader::{ArtifactReader, CancellationToken, RefreshOutcome};
pub use crate::synth::{MidpointSynthesizer, SeededSynthesizer, Synthesizer};
