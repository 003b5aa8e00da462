//! Overview composition: top-level summary figures from the three sections.

use std::collections::BTreeMap;

use crate::aggregate::{AggregationContext, InternalAnalysis, ProcessAnalysis};
use crate::core::metrics::{complement, percentage};
use crate::core::{AnalysisStatus, LotQuality, LotRecord, NamedCount, Overview, RftShare, TimelinePoint};
use crate::normalize::fields::DEFAULT_ERROR_TYPE;
use crate::synth::{monthly_trend, ranges, Synthesizer};
use crate::tally::PassFail;

/// Generic issue categories and their share of failures, used when no
/// failing record names an error type.
pub const FALLBACK_ISSUES: &[(&str, f64)] = &[
    ("Documentation Error", 0.4),
    ("Process Deviation", 0.3),
    ("Equipment Issue", 0.15),
    ("Material Issue", 0.15),
];

const RECORD_TREND_BASE: f64 = 90.0;
const LOT_TREND_BASE: f64 = 91.0;

pub fn compose(
    internal: &InternalAnalysis,
    process: &ProcessAnalysis,
    status: AnalysisStatus,
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> Overview {
    let lot_quality = lot_quality(&process.lots, synth);

    Overview {
        total_records: internal.totals.total(),
        total_lots: process.lots.len() as u64,
        overall_rft_rate: lot_quality.percentage,
        analysis_status: status,
        rft_performance: rft_performance(internal.totals),
        issue_distribution: issue_distribution(internal, ctx.issue_distribution_top),
        lot_quality,
        process_timeline: process_timeline(process, ctx, synth),
    }
}

/// Pure function splitting record totals into Pass and Fail shares.
/// Fail is the complement of Pass so the two always sum to 100.
pub fn rft_performance(totals: PassFail) -> Vec<RftShare> {
    let pass_percentage = totals.rft_rate();
    let fail_percentage = if totals.total() > 0 {
        complement(pass_percentage)
    } else {
        0.0
    };
    vec![
        RftShare {
            name: "Pass".to_string(),
            value: totals.pass,
            percentage: pass_percentage,
        },
        RftShare {
            name: "Fail".to_string(),
            value: totals.fail,
            percentage: fail_percentage,
        },
    ]
}

fn issue_distribution(internal: &InternalAnalysis, top: usize) -> Vec<NamedCount> {
    let named: Vec<NamedCount> = internal
        .error_types
        .descending()
        .into_iter()
        .filter(|(name, _)| name != DEFAULT_ERROR_TYPE)
        .take(top)
        .map(|(name, value)| NamedCount { name, value })
        .collect();
    if !named.is_empty() {
        return named;
    }

    let failures = internal.totals.fail as f64;
    FALLBACK_ISSUES
        .iter()
        .map(|(name, share)| NamedCount {
            name: name.to_string(),
            value: (failures * share).round() as u64,
        })
        .collect()
}

fn lot_quality(lots: &BTreeMap<String, LotRecord>, synth: &mut dyn Synthesizer) -> LotQuality {
    let fail = lots.values().filter(|l| l.has_errors).count() as u64;
    let total = lots.len() as u64;
    let pass = total - fail;
    LotQuality {
        pass,
        fail,
        percentage: percentage(pass, total),
        change: if total > 0 {
            synth.draw1(ranges::LOT_QUALITY_CHANGE)
        } else {
            0.0
        },
    }
}

fn process_timeline(
    process: &ProcessAnalysis,
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> Vec<TimelinePoint> {
    ctx.months
        .labels()
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let monthly = process.monthly.get(i).copied().unwrap_or_default();
            TimelinePoint {
                month: month.clone(),
                record_rft: monthly
                    .record_rft
                    .unwrap_or_else(|| monthly_trend(synth, RECORD_TREND_BASE, i)),
                lot_rft: monthly
                    .lot_rft
                    .unwrap_or_else(|| monthly_trend(synth, LOT_TREND_BASE, i)),
            }
        })
        .collect()
}
