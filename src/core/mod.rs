pub mod metrics;
pub mod records;

pub use records::{ExternalRecord, InternalRecord, ProcessRecord, Reviewer, SourceKind};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The aggregate metrics document consumed by the dashboard.
///
/// Built once per pipeline run and replaced wholesale; nothing updates it
/// incrementally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDocument {
    pub overview: Overview,
    #[serde(rename = "internalRFT")]
    pub internal_rft: InternalRft,
    #[serde(rename = "externalRFT")]
    pub external_rft: ExternalRft,
    pub process_metrics: ProcessMetrics,
    pub lot_data: BTreeMap<String, LotRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_records: u64,
    pub total_lots: u64,
    #[serde(rename = "overallRFTRate")]
    pub overall_rft_rate: f64,
    pub analysis_status: AnalysisStatus,
    pub rft_performance: Vec<RftShare>,
    pub issue_distribution: Vec<NamedCount>,
    pub lot_quality: LotQuality,
    pub process_timeline: Vec<TimelinePoint>,
}

/// Tri-state summary of how many sources fed the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "Complete")]
    Complete,
    #[serde(rename = "Partial Data Processed")]
    Partial,
    #[default]
    #[serde(rename = "Using Default Data")]
    Default,
}

impl AnalysisStatus {
    pub fn from_counts(processed: usize, total: usize) -> Self {
        match processed {
            0 => AnalysisStatus::Default,
            n if n >= total => AnalysisStatus::Complete,
            _ => AnalysisStatus::Partial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Complete => "Complete",
            AnalysisStatus::Partial => "Partial Data Processed",
            AnalysisStatus::Default => "Using Default Data",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RftShare {
    pub name: String,
    pub value: u64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LotQuality {
    pub pass: u64,
    pub fail: u64,
    pub percentage: f64,
    pub change: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub month: String,
    #[serde(rename = "recordRFT")]
    pub record_rft: f64,
    #[serde(rename = "lotRFT")]
    pub lot_rft: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalRft {
    pub department_performance: Vec<DepartmentPerformance>,
    pub form_errors: Vec<FormError>,
    pub error_type_pareto: Vec<ParetoEntry>,
    pub form_error_trends: Vec<FormErrorTrend>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPerformance {
    pub department: String,
    pub pass: u64,
    pub fail: u64,
    pub rft_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormError {
    pub name: String,
    pub errors: u64,
    pub percentage: f64,
    pub trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParetoEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    pub cumulative: u64,
}

/// One month of error counts keyed by form error name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrorTrend {
    pub month: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRft {
    pub issue_categories: Vec<NamedCount>,
    pub customer_comments: Vec<CategorySentiment>,
    pub correlation_data: Vec<CorrelationPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySentiment {
    pub category: String,
    pub count: u64,
    pub sentiment: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPoint {
    pub month: String,
    #[serde(rename = "internalRFT")]
    pub internal_rft: f64,
    #[serde(rename = "externalRFT")]
    pub external_rft: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub review_times: ReviewTimes,
    pub cycle_time_breakdown: Vec<StepTime>,
    pub waiting_times: Vec<WaitTime>,
    pub total_cycle_time: TotalCycleTime,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewTimes {
    #[serde(rename = "NN")]
    pub nn: Vec<f64>,
    #[serde(rename = "PCI")]
    pub pci: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepTime {
    pub step: String,
    pub time: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaitTime {
    pub from: String,
    pub to: String,
    pub time: f64,
}

/// Band estimate around the summed step and wait times.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalCycleTime {
    pub average: f64,
    pub target: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// How a lot's cycle time was obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleTimeSource {
    Recorded,
    DateSpan,
    #[default]
    Synthesized,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotRecord {
    pub rft_rate: f64,
    pub cycle_time: f64,
    pub has_errors: bool,
    pub release_date: String,
    pub department: String,
    pub record_count: u64,
    pub error_count: u64,
    #[serde(skip)]
    pub cycle_time_source: CycleTimeSource,
}
