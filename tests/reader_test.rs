use chrono::{NaiveDate, Utc};
use rft_metrics::aggregate::AggregationContext;
use rft_metrics::config::{AnalysisSettings, OutputConfig, RetryConfig, SourcesConfig};
use rft_metrics::io::write_artifacts;
use rft_metrics::normalize::Workbook;
use rft_metrics::pipeline::{self, PipelineInputs};
use rft_metrics::reader::{ArtifactReader, CancellationToken, FileStatus, RefreshOutcome};
use rft_metrics::synth::MidpointSynthesizer;
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fast_retry() -> RetryConfig {
    RetryConfig {
        base_delay_ms: 1,
        ..Default::default()
    }
}

fn publish(dir: &TempDir) -> OutputConfig {
    let output = OutputConfig {
        dir: dir.path().join("public"),
        ..Default::default()
    };
    let ctx = AggregationContext::from_settings(
        &AnalysisSettings::default(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    );
    let internal =
        Workbook::from_value(json!([{"Department": "A", "Status": "Pass"}])).unwrap();
    let inputs = PipelineInputs::from_workbooks(internal, Workbook::default(), Workbook::default());
    let run = pipeline::run(&inputs, &ctx, &mut MidpointSynthesizer);
    write_artifacts(&run, &output, &SourcesConfig::default(), Utc::now()).unwrap();
    output
}

#[test]
fn test_reader_loads_primary_artifact() {
    let dir = TempDir::new().unwrap();
    let output = publish(&dir);
    let reader = ArtifactReader::from_output(&output, fast_retry());

    let outcome = reader.refresh(&CancellationToken::new());
    assert_eq!(
        outcome,
        RefreshOutcome::Loaded {
            from: "data/complete-data.json".to_string()
        }
    );

    let snapshot = reader.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.error, None);
    assert!(snapshot.last_updated.is_some());
    assert_eq!(snapshot.data.unwrap().overview.total_records, 1);
    assert_eq!(
        snapshot.file_status["data/complete-data.json"],
        FileStatus::Success
    );
    assert_eq!(snapshot.file_status["complete-data.json"], FileStatus::Pending);
}

#[test]
fn test_reader_falls_back_when_primary_is_missing() {
    let dir = TempDir::new().unwrap();
    let output = publish(&dir);
    fs::remove_file(output.primary_path()).unwrap();
    let reader = ArtifactReader::from_output(&output, fast_retry());

    let outcome = reader.refresh(&CancellationToken::new());
    assert_eq!(
        outcome,
        RefreshOutcome::Loaded {
            from: "complete-data.json".to_string()
        }
    );
    let snapshot = reader.snapshot();
    assert_eq!(snapshot.file_status["data/complete-data.json"], FileStatus::Error);
    assert_eq!(snapshot.file_status["complete-data.json"], FileStatus::Success);
}

#[test]
fn test_reader_keeps_previous_document_when_both_fail() {
    let dir = TempDir::new().unwrap();
    let output = publish(&dir);
    let reader = ArtifactReader::from_output(&output, fast_retry());
    reader.refresh(&CancellationToken::new());
    assert!(reader.data().is_some());

    fs::write(output.primary_path(), "{ not json").unwrap();
    fs::remove_file(output.fallback_path()).unwrap();

    match reader.refresh(&CancellationToken::new()) {
        RefreshOutcome::Failed { error } => assert!(error.starts_with("Failed to load data")),
        other => panic!("expected failure, got {other:?}"),
    }
    let snapshot = reader.snapshot();
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.data.unwrap().overview.total_records, 1);
}

#[test]
fn test_cancelled_refresh_is_silent() {
    let dir = TempDir::new().unwrap();
    let output = OutputConfig {
        dir: dir.path().join("nothing-here"),
        ..Default::default()
    };
    let reader = ArtifactReader::from_output(
        &output,
        RetryConfig {
            base_delay_ms: 5_000,
            ..Default::default()
        },
    );
    let token = CancellationToken::new();

    let outcome = std::thread::scope(|scope| {
        let handle = scope.spawn(|| reader.refresh(&token));
        std::thread::sleep(Duration::from_millis(50));
        token.cancel();
        handle.join().unwrap()
    });

    assert_eq!(outcome, RefreshOutcome::Cancelled);
    let snapshot = reader.snapshot();
    assert_eq!(snapshot.error, None);
    assert!(!snapshot.is_loading);
    assert!(snapshot.data.is_none());
    assert!(snapshot.last_updated.is_none());
    assert!(snapshot.file_status.values().all(|s| *s == FileStatus::Pending));
}
