use chrono::NaiveDate;
use indoc::indoc;
use pretty_assertions::assert_eq;
use rft_metrics::aggregate::AggregationContext;
use rft_metrics::config::AnalysisSettings;
use rft_metrics::core::{AnalysisStatus, DepartmentPerformance, ParetoEntry, Trend};
use rft_metrics::errors::SourceError;
use rft_metrics::normalize::Workbook;
use rft_metrics::pipeline::{self, PipelineInputs, PipelineRun};
use rft_metrics::synth::{ranges, MidpointSynthesizer, SeededSynthesizer};
use std::path::PathBuf;

fn workbook(json: &str) -> Workbook {
    Workbook::from_value(serde_json::from_str(json).unwrap()).unwrap()
}

fn context() -> AggregationContext {
    AggregationContext::from_settings(
        &AnalysisSettings::default(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    )
}

fn missing(name: &str) -> Result<Workbook, SourceError> {
    Err(SourceError::NotFound {
        path: PathBuf::from(name),
    })
}

const INTERNAL: &str = indoc! {r#"
    {
      "January": [
        {"Department": "Assembly", "Status": "Pass", "Date": "2024-01-05"},
        {"Department": "Assembly", "Status": "Fail", "Error Type": "Missing Signature",
         "Form Type": "Batch Record", "Date": "2024-01-09"},
        {"Department": "QA", "Status": "Fail", "Error Type": "Wrong Date",
         "Form Type": "Batch Record", "Date": "2024-02-11"}
      ],
      "February": [
        {"Department": "QA", "Status": "Pass", "Date": "2024-02-14"},
        {"Department": "Assembly", "Status": "Fail", "Error Type": "Missing Signature",
         "Form Type": "Label Log", "Date": "2024-05-02"}
      ]
    }
"#};

const EXTERNAL: &str = indoc! {r#"
    [
      {"Customer": "Acme", "Category": "Quality", "Comment": "excellent quality, no issues", "Status": "Pass"},
      {"Customer": "Acme", "Category": "Delivery", "Comment": "bad delay problem", "Status": "Fail"},
      {"Customer": "Beta", "Category": "Quality", "Status": "Pass"}
    ]
"#};

const PROCESS: &str = indoc! {r#"
    [
      {"Lot": "B1", "Step": "Assembly", "StartDate": "2024-01-01", "ReleaseDate": "2024-01-20"},
      {"Lot": "B2", "Step": "Packaging", "CycleTime": 12, "Status": "Fail"},
      {"Lot": "B2", "Step": "Release", "CycleTime": 14}
    ]
"#};

fn complete_run(synth_seed: u64) -> PipelineRun {
    let inputs = PipelineInputs::from_workbooks(
        workbook(INTERNAL),
        workbook(EXTERNAL),
        workbook(PROCESS),
    );
    pipeline::run(&inputs, &context(), &mut SeededSynthesizer::from_seed(synth_seed))
}

#[test]
fn test_department_performance_from_pass_and_fail_rows() {
    let inputs = PipelineInputs::new(
        Ok(workbook(
            r#"[{"Department": "A", "Status": "Fail"}, {"Department": "A", "Status": "Pass"}]"#,
        )),
        missing("external.json"),
        missing("process.json"),
    );
    let run = pipeline::run(&inputs, &context(), &mut MidpointSynthesizer);

    assert_eq!(
        run.document.internal_rft.department_performance,
        vec![DepartmentPerformance {
            department: "A".to_string(),
            pass: 1,
            fail: 1,
            rft_rate: 50.0,
        }]
    );
    assert_eq!(run.status(), AnalysisStatus::Partial);
}

#[test]
fn test_complete_run_sections() {
    let run = complete_run(3);
    let doc = &run.document;

    assert_eq!(run.processed_count(), 3);
    assert_eq!(doc.overview.analysis_status, AnalysisStatus::Complete);
    assert_eq!(doc.overview.total_records, 5);
    assert_eq!(doc.overview.total_lots, 2);

    assert_eq!(
        doc.internal_rft.error_type_pareto,
        vec![
            ParetoEntry {
                kind: "Missing Signature".to_string(),
                count: 2,
                cumulative: 2,
            },
            ParetoEntry {
                kind: "Wrong Date".to_string(),
                count: 1,
                cumulative: 3,
            },
        ]
    );

    let forms: Vec<_> = doc
        .internal_rft
        .form_errors
        .iter()
        .map(|f| (f.name.as_str(), f.errors))
        .collect();
    assert_eq!(forms, vec![("Batch Record", 2), ("Label Log", 1)]);
    assert_eq!(doc.internal_rft.form_errors[0].trend, Trend::Down);
    assert_eq!(doc.internal_rft.form_errors[1].trend, Trend::Up);
}

#[test]
fn test_sentiment_sign_follows_comments() {
    let run = complete_run(5);
    let comments = &run.document.external_rft.customer_comments;
    let quality = comments.iter().find(|c| c.category == "Quality").unwrap();
    let delivery = comments.iter().find(|c| c.category == "Delivery").unwrap();

    assert_eq!(quality.count, 2);
    assert!(quality.sentiment > 0.0);
    assert!(delivery.sentiment < 0.0);
}

#[test]
fn test_lot_cycle_time_from_date_span() {
    let run = complete_run(9);
    let b1 = &run.document.lot_data["B1"];
    assert_eq!(b1.cycle_time, 19.0);
    assert_eq!(b1.release_date, "2024-01-20");
    assert!(!b1.has_errors);

    let b2 = &run.document.lot_data["B2"];
    assert_eq!(b2.cycle_time, 14.0);
    assert_eq!(b2.record_count, 2);
    assert_eq!(b2.error_count, 1);
    assert_eq!(b2.rft_rate, 50.0);

    let quality = &run.document.overview.lot_quality;
    assert_eq!((quality.pass, quality.fail), (1, 1));
    assert_eq!(run.document.overview.overall_rft_rate, 50.0);
}

#[test]
fn test_rft_performance_sums_to_hundred() {
    let run = complete_run(11);
    let shares = &run.document.overview.rft_performance;
    let sum: f64 = shares.iter().map(|s| s.percentage).sum();
    assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
    assert_eq!(shares[0].value, 2);
    assert_eq!(shares[1].value, 3);
}

#[test]
fn test_no_sources_gives_default_document() {
    let inputs = PipelineInputs::new(
        missing("internal.json"),
        missing("external.json"),
        missing("process.json"),
    );
    let run = pipeline::run(&inputs, &context(), &mut SeededSynthesizer::from_seed(1));
    let doc = &run.document;

    assert_eq!(run.status(), AnalysisStatus::Default);
    assert_eq!(doc.overview.total_records, 0);
    assert_eq!(doc.overview.total_lots, 0);
    assert_eq!(doc.overview.lot_quality.pass + doc.overview.lot_quality.fail, 0);
    assert_eq!(doc.overview.lot_quality.percentage, 0.0);
    assert_eq!(doc.overview.lot_quality.change, 0.0);
    assert_eq!(doc.overview.process_timeline.len(), 6);
    assert_eq!(doc.external_rft.correlation_data.len(), 6);
    for point in &doc.external_rft.correlation_data {
        assert!(ranges::INTERNAL_MONTH_RFT.contains_rounded(point.internal_rft));
        assert!(ranges::EXTERNAL_MONTH_RFT.contains_rounded(point.external_rft));
    }
    assert_eq!(doc.process_metrics.review_times.nn.len(), 6);
    for value in &doc.process_metrics.review_times.pci {
        assert!(ranges::PCI_REVIEW_TIME.contains_rounded(*value));
    }
}

#[test]
fn test_same_seed_is_idempotent() {
    assert_eq!(complete_run(42).document, complete_run(42).document);
}

#[test]
fn test_deterministic_fields_do_not_depend_on_seed() {
    let a = complete_run(1).document;
    let b = complete_run(2).document;

    assert_eq!(a.internal_rft, b.internal_rft);
    assert_eq!(a.overview.rft_performance, b.overview.rft_performance);
    assert_eq!(a.overview.issue_distribution, b.overview.issue_distribution);
    assert_eq!(a.lot_data, b.lot_data);
    assert_eq!(a.external_rft.issue_categories, b.external_rft.issue_categories);
    assert_eq!(a.external_rft.customer_comments, b.external_rft.customer_comments);
}

#[test]
fn test_document_serializes_with_dashboard_keys() {
    let value = serde_json::to_value(&complete_run(4).document).unwrap();
    for key in ["overview", "internalRFT", "externalRFT", "processMetrics", "lotData"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value["overview"].get("overallRFTRate").is_some());
    assert!(value["processMetrics"]["reviewTimes"].get("NN").is_some());
    assert_eq!(value["lotData"]["B1"]["cycleTime"], serde_json::json!(19.0));
}

#[test]
fn test_unlabelled_row_does_not_join_lot_sharing_its_placeholder_id() {
    let inputs = PipelineInputs::new(
        missing("internal.json"),
        missing("external.json"),
        Ok(workbook(
            r#"[{"Lot": "L1001", "Status": "Pass"}, {"Step": "Assembly", "Status": "Fail"}]"#,
        )),
    );
    let run = pipeline::run(&inputs, &context(), &mut MidpointSynthesizer);
    let lots = &run.document.lot_data;

    assert_eq!(lots.len(), 2);
    let recorded = &lots["L1001"];
    assert_eq!(recorded.record_count, 1);
    assert_eq!(recorded.error_count, 0);
    assert!(!recorded.has_errors);
    assert_eq!(run.document.overview.total_lots, 2);
}
