use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::retry::RetryConfig;
use crate::core::SourceKind;

/// Root configuration structure for rft-metrics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RftConfig {
    /// Decoded workbook locations
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Artifact locations and formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Aggregation settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Artifact retrieval policy for readers
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcesConfig {
    #[serde(default = "default_internal_source")]
    pub internal: PathBuf,
    #[serde(default = "default_external_source")]
    pub external: PathBuf,
    #[serde(default = "default_process_source")]
    pub process: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            internal: default_internal_source(),
            external: default_external_source(),
            process: default_process_source(),
        }
    }
}

impl SourcesConfig {
    pub fn path_for(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Internal => &self.internal,
            SourceKind::External => &self.external,
            SourceKind::Process => &self.process,
        }
    }
}

fn default_internal_source() -> PathBuf {
    PathBuf::from("data/internal.json")
}

fn default_external_source() -> PathBuf {
    PathBuf::from("data/external.json")
}

fn default_process_source() -> PathBuf {
    PathBuf::from("data/process.json")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Base directory every artifact path is relative to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Primary aggregate document
    #[serde(default = "default_primary")]
    pub primary: PathBuf,

    /// Verbatim copy readers use when the primary is unavailable
    #[serde(default = "default_fallback")]
    pub fallback: PathBuf,

    /// Run metadata (timestamp, processed sources)
    #[serde(default = "default_metadata")]
    pub metadata: PathBuf,

    /// Pretty-print JSON artifacts
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            primary: default_primary(),
            fallback: default_fallback(),
            metadata: default_metadata(),
            pretty: default_pretty(),
        }
    }
}

impl OutputConfig {
    pub fn primary_path(&self) -> PathBuf {
        self.dir.join(&self.primary)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.dir.join(&self.fallback)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(&self.metadata)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_primary() -> PathBuf {
    PathBuf::from("data/complete-data.json")
}

fn default_fallback() -> PathBuf {
    PathBuf::from("complete-data.json")
}

fn default_metadata() -> PathBuf {
    PathBuf::from("data/metadata.json")
}

fn default_pretty() -> bool {
    true
}

/// Knobs for the aggregation itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Month labels for every monthly series, in display order
    #[serde(default = "default_months")]
    pub months: Vec<String>,

    /// Error types shown in the overview issue distribution
    #[serde(default = "default_issue_distribution_top")]
    pub issue_distribution_top: usize,

    /// Form error rows kept in the internal section
    #[serde(default = "default_form_error_top")]
    pub form_error_top: usize,

    /// Form errors plotted in the monthly trend series
    #[serde(default = "default_trend_series")]
    pub trend_series: usize,

    /// Target cycle time in days when the process data records none
    #[serde(default = "default_cycle_target")]
    pub default_cycle_target: f64,

    /// Fixed seed for synthesized values; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            months: default_months(),
            issue_distribution_top: default_issue_distribution_top(),
            form_error_top: default_form_error_top(),
            trend_series: default_trend_series(),
            default_cycle_target: default_cycle_target(),
            seed: None,
        }
    }
}

fn default_months() -> Vec<String> {
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_issue_distribution_top() -> usize {
    5
}

fn default_form_error_top() -> usize {
    5
}

fn default_trend_series() -> usize {
    3
}

fn default_cycle_target() -> f64 {
    18.0
}
