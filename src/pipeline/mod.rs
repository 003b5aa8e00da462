//! Single linear aggregation run.
//!
//! Loading happens before this module; each source arrives as either a
//! decoded workbook or the reason it could not be loaded. A missing source
//! degrades its section to fallbacks and lowers the analysis status. It
//! never aborts the run.

use crate::aggregate::{
    aggregate_external, aggregate_internal, aggregate_process, AggregationContext,
};
use crate::core::{AggregateDocument, AnalysisStatus, SourceKind};
use crate::errors::SourceError;
use crate::normalize::{
    normalize_external, normalize_internal, normalize_process, normalize_workbook, Workbook,
};
use crate::overview;
use crate::synth::Synthesizer;

/// Per-source load results.
#[derive(Debug)]
pub struct PipelineInputs {
    pub internal: Result<Workbook, SourceError>,
    pub external: Result<Workbook, SourceError>,
    pub process: Result<Workbook, SourceError>,
}

impl PipelineInputs {
    pub fn new(
        internal: Result<Workbook, SourceError>,
        external: Result<Workbook, SourceError>,
        process: Result<Workbook, SourceError>,
    ) -> Self {
        Self {
            internal,
            external,
            process,
        }
    }

    /// All three sources present.
    pub fn from_workbooks(internal: Workbook, external: Workbook, process: Workbook) -> Self {
        Self::new(Ok(internal), Ok(external), Ok(process))
    }

    pub fn get(&self, kind: SourceKind) -> &Result<Workbook, SourceError> {
        match kind {
            SourceKind::Internal => &self.internal,
            SourceKind::External => &self.external,
            SourceKind::Process => &self.process,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Loaded { rows: usize, sheets: usize },
    Unavailable { reason: String },
}

impl SourceOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceOutcome::Loaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub outcome: SourceOutcome,
}

/// The document plus how each source fared.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub document: AggregateDocument,
    pub sources: Vec<SourceReport>,
}

impl PipelineRun {
    pub fn processed_count(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_loaded()).count()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.document.overview.analysis_status
    }
}

/// Pure function resolving a load result to a usable workbook. Empty
/// workbooks count as unavailable.
fn usable(kind: SourceKind, input: &Result<Workbook, SourceError>) -> (Option<&Workbook>, SourceReport) {
    let outcome = match input {
        Ok(workbook) if workbook.row_count() > 0 => SourceOutcome::Loaded {
            rows: workbook.row_count(),
            sheets: workbook.sheets.len(),
        },
        Ok(_) => SourceOutcome::Unavailable {
            reason: "no rows".to_string(),
        },
        Err(e) => SourceOutcome::Unavailable {
            reason: e.with_causes(),
        },
    };

    match &outcome {
        SourceOutcome::Loaded { rows, sheets } => {
            log::info!("{} source: {} rows across {} sheets", kind, rows, sheets);
        }
        SourceOutcome::Unavailable { reason } => {
            log::warn!("{} source unavailable ({}), using fallbacks", kind, reason);
        }
    }

    let workbook = match (&outcome, input) {
        (SourceOutcome::Loaded { .. }, Ok(workbook)) => Some(workbook),
        _ => None,
    };
    (workbook, SourceReport { kind, outcome })
}

/// Run normalization, the three aggregators, and the overview composer.
pub fn run(
    inputs: &PipelineInputs,
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> PipelineRun {
    let (internal_wb, internal_report) = usable(SourceKind::Internal, &inputs.internal);
    let (external_wb, external_report) = usable(SourceKind::External, &inputs.external);
    let (process_wb, process_report) = usable(SourceKind::Process, &inputs.process);

    let internal_records = internal_wb
        .map(|wb| normalize_workbook(wb, normalize_internal))
        .unwrap_or_default();
    let external_records = external_wb
        .map(|wb| normalize_workbook(wb, normalize_external))
        .unwrap_or_default();
    let process_records = process_wb
        .map(|wb| normalize_workbook(wb, normalize_process))
        .unwrap_or_default();

    let internal = aggregate_internal(&internal_records, ctx);
    let process = aggregate_process(&process_records, ctx, synth);
    let external_rft = aggregate_external(&external_records, &internal.monthly_rft, ctx, synth);

    let sources = vec![internal_report, external_report, process_report];
    let processed = sources.iter().filter(|s| s.outcome.is_loaded()).count();
    let status = AnalysisStatus::from_counts(processed, SourceKind::ALL.len());
    let overview = overview::compose(&internal, &process, status, ctx, synth);

    log::info!(
        "Aggregated {} internal, {} external, {} process records ({})",
        internal_records.len(),
        external_records.len(),
        process_records.len(),
        status.label()
    );

    PipelineRun {
        document: AggregateDocument {
            overview,
            internal_rft: internal.section,
            external_rft,
            process_metrics: process.section,
            lot_data: process.lots,
        },
        sources,
    }
}
