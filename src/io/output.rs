//! Artifact writing: the aggregate document, its fallback copy, metadata.
//!
//! Every file is written to a hidden sibling first and renamed over the
//! target, so a reader sees either the old document or the new one.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{OutputConfig, SourcesConfig};
use crate::core::{AnalysisStatus, SourceKind};
use crate::errors::OutputError;
use crate::pipeline::PipelineRun;

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub last_updated: DateTime<Utc>,
    pub files: Vec<SourceFile>,
    pub processed_files: usize,
    pub analysis_status: AnalysisStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub filename: String,
}

impl RunMetadata {
    pub fn new(run: &PipelineRun, sources: &SourcesConfig, now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now,
            files: SourceKind::ALL
                .iter()
                .map(|&kind| SourceFile {
                    kind,
                    filename: sources
                        .path_for(kind)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                })
                .collect(),
            processed_files: run.processed_count(),
            analysis_status: run.status(),
        }
    }
}

/// Where a run's artifacts landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub primary: PathBuf,
    pub fallback: PathBuf,
    pub metadata: PathBuf,
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool, what: &'static str) -> Result<String, OutputError> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|source| OutputError::Serialize { what, source })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `contents` to `path` through a temp file and rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        super::ensure_dir(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp = temp_sibling(path);
    let write_err = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&temp, contents).map_err(write_err)?;
    if let Err(source) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(write_err(source));
    }
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Write the document to the primary and fallback locations, then the
/// run metadata.
pub fn write_artifacts(
    run: &PipelineRun,
    output: &OutputConfig,
    sources: &SourcesConfig,
    now: DateTime<Utc>,
) -> Result<WrittenArtifacts, OutputError> {
    let document = to_json(&run.document, output.pretty, "aggregate document")?;
    let written = WrittenArtifacts {
        primary: output.primary_path(),
        fallback: output.fallback_path(),
        metadata: output.metadata_path(),
    };

    write_atomic(&written.primary, &document)?;
    write_atomic(&written.fallback, &document)?;

    let metadata = to_json(&RunMetadata::new(run, sources, now), true, "run metadata")?;
    write_atomic(&written.metadata, &metadata)?;

    log::info!(
        "Saved aggregate document to {} (fallback {})",
        written.primary.display(),
        written.fallback.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregationContext;
    use crate::errors::SourceError;
    use crate::normalize::Workbook;
    use crate::pipeline::{run, PipelineInputs};
    use crate::synth::MidpointSynthesizer;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_run() -> PipelineRun {
        let inputs = PipelineInputs::new(
            Workbook::from_value(json!([{"Department": "A", "Status": "Pass"}]))
                .map_err(|source| SourceError::Shape {
                    path: "internal.json".into(),
                    source,
                }),
            Err(SourceError::NotFound {
                path: "external.json".into(),
            }),
            Err(SourceError::NotFound {
                path: "process.json".into(),
            }),
        );
        run(&inputs, &AggregationContext::today(), &mut MidpointSynthesizer)
    }

    #[test]
    fn test_primary_and_fallback_are_identical() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let written =
            write_artifacts(&sample_run(), &output, &SourcesConfig::default(), Utc::now()).unwrap();

        let primary = fs::read(&written.primary).unwrap();
        let fallback = fs::read(&written.fallback).unwrap();
        assert_eq!(primary, fallback);
        assert!(written.primary.ends_with("data/complete-data.json"));
        assert!(!temp_sibling(&written.primary).exists());
    }

    #[test]
    fn test_metadata_contents() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let written =
            write_artifacts(&sample_run(), &output, &SourcesConfig::default(), Utc::now()).unwrap();

        let metadata: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(written.metadata).unwrap()).unwrap();
        assert_eq!(metadata["processedFiles"], 1);
        assert_eq!(metadata["analysisStatus"], "Partial Data Processed");
        assert_eq!(metadata["files"][0]["type"], "internal");
        assert_eq!(metadata["files"][0]["filename"], "internal.json");
        assert!(metadata["lastUpdated"].is_string());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        write_atomic(&path, "{\"v\":1}").unwrap();
        write_atomic(&path, "{\"v\":2}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"v\":2}");
    }
}
