//! Process aggregation: lots, review times, step breakdown, waits.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};

use super::{bucket_by_month, AggregationContext};
use crate::core::metrics::{mean, percentage, round1};
use crate::core::{
    CycleTimeSource, LotRecord, ProcessMetrics, ProcessRecord, ReviewTimes, Reviewer, StepTime,
    TotalCycleTime, WaitTime,
};
use crate::normalize::fields::DEFAULT_LOT_DEPARTMENT;
use crate::synth::{ranges, FallbackRange, Synthesizer};
use crate::tally::PassFail;

/// Steps shown when the process data names none, with their base times.
pub const DEFAULT_STEPS: &[(&str, f64)] = &[
    ("Bulk Receipt", 1.0),
    ("Assembly", 3.0),
    ("PCI Review", 3.0),
    ("NN Review", 3.0),
    ("Packaging", 2.0),
    ("Final Review", 1.5),
    ("Release", 1.0),
];

/// Keyword defaults for named steps without durations, first match wins.
const STEP_KEYWORDS: &[(&str, f64)] = &[
    ("Receipt", 1.0),
    ("Assembly", 3.0),
    ("Review", 3.0),
    ("Final", 1.5),
    ("Packag", 2.0),
];

const DEFAULT_STEP_TIME: f64 = 2.0;
const NN_DEFAULT_REVIEW_TIME: f64 = 2.5;
const PCI_DEFAULT_REVIEW_TIME: f64 = 3.0;
const SYNTHETIC_LOT_DEPARTMENTS: &[&str] = &["Production", "Quality", "Packaging"];
const SYNTHETIC_LOT_ID_BASE: u64 = 1001;
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";
const PLACEHOLDER_COLLISION_SUFFIX: &str = "-row";

/// Record and lot RFT of one month, `None` when the month has no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyProcessRft {
    pub record_rft: Option<f64>,
    pub lot_rft: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ProcessAnalysis {
    pub section: ProcessMetrics,
    pub lots: BTreeMap<String, LotRecord>,
    /// True when the input carried no lot ids and every lot was synthesized.
    pub lots_synthesized: bool,
    pub monthly: Vec<MonthlyProcessRft>,
}

pub fn aggregate_process(
    records: &[ProcessRecord],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> ProcessAnalysis {
    let lots_synthesized =
        !records.is_empty() && records.iter().all(|r| r.recorded_lot().is_none());
    let lots = if lots_synthesized {
        log::debug!("No lot identifiers in {} process rows, synthesizing lots", records.len());
        synthesize_lots(synth)
    } else {
        build_lots(records, ctx, synth)
    };

    let review_times = review_times(records, ctx, synth);
    let (cycle_time_breakdown, waiting_times) = step_breakdown(records, synth);
    let total_cycle_time = total_cycle_time(records, &cycle_time_breakdown, &waiting_times, ctx);
    let monthly = monthly_rft(records, &lots, ctx);

    ProcessAnalysis {
        section: ProcessMetrics {
            review_times,
            cycle_time_breakdown,
            waiting_times,
            total_cycle_time,
        },
        lots,
        lots_synthesized,
        monthly,
    }
}

fn build_lots(
    records: &[ProcessRecord],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> BTreeMap<String, LotRecord> {
    let mut grouped: BTreeMap<(&str, bool), Vec<&ProcessRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry((record.lot.as_str(), record.lot_is_placeholder))
            .or_default()
            .push(record);
    }
    let recorded: BTreeSet<&str> = grouped
        .keys()
        .filter(|(_, placeholder)| !placeholder)
        .map(|(lot, _)| *lot)
        .collect();

    grouped
        .into_iter()
        .map(|((lot, placeholder), rows)| {
            // a placeholder never joins a recorded lot that happens to share its id
            let key = if placeholder && recorded.contains(lot) {
                format!("{}{}", lot, PLACEHOLDER_COLLISION_SUFFIX)
            } else {
                lot.to_string()
            };
            let record = lot_record(&key, &rows, ctx, synth);
            (key, record)
        })
        .collect()
}

fn lot_record(
    lot: &str,
    rows: &[&ProcessRecord],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> LotRecord {
    let record_count = rows.len() as u64;
    let error_count = rows.iter().filter(|r| r.has_error).count() as u64;
    let (cycle_time, cycle_time_source) = match lot_cycle_time(rows) {
        Some(found) => found,
        None => {
            log::debug!("Lot {} has no cycle time or date span, synthesizing", lot);
            (synth.draw1(ranges::LOT_CYCLE_TIME), CycleTimeSource::Synthesized)
        }
    };

    LotRecord {
        rft_rate: percentage(record_count - error_count, record_count),
        cycle_time,
        has_errors: error_count > 0,
        release_date: release_date(rows)
            .unwrap_or(ctx.as_of)
            .format(RELEASE_DATE_FORMAT)
            .to_string(),
        department: rows
            .iter()
            .find_map(|r| r.department.clone())
            .unwrap_or_else(|| DEFAULT_LOT_DEPARTMENT.to_string()),
        record_count,
        error_count,
        cycle_time_source,
    }
}

/// Pure function resolving a lot's cycle time: the largest recorded value,
/// else whole days from the earliest start to the latest release.
pub fn lot_cycle_time(rows: &[&ProcessRecord]) -> Option<(f64, CycleTimeSource)> {
    let recorded = rows
        .iter()
        .filter_map(|r| r.cycle_time)
        .filter(|t| *t > 0.0)
        .fold(None, |max: Option<f64>, t| Some(max.map_or(t, |m| m.max(t))));
    if let Some(t) = recorded {
        return Some((round1(t), CycleTimeSource::Recorded));
    }

    let start = rows.iter().filter_map(|r| r.start_date).min()?;
    let end = rows
        .iter()
        .filter_map(|r| r.release_date.or(r.end_date))
        .max()?;
    let days = (end - start).num_days();
    (days > 0).then_some((days as f64, CycleTimeSource::DateSpan))
}

fn release_date(rows: &[&ProcessRecord]) -> Option<NaiveDate> {
    rows.iter()
        .filter_map(|r| r.release_date)
        .max()
        .or_else(|| rows.iter().filter_map(|r| r.end_date).max())
        .or_else(|| rows.iter().filter_map(|r| r.start_date).max())
}

fn synthesize_lots(synth: &mut dyn Synthesizer) -> BTreeMap<String, LotRecord> {
    let (low, high) = ranges::SYNTHETIC_LOT_COUNT;
    let count = synth.count(low, high);
    let epoch = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN);

    (0..count)
        .map(|i| {
            let has_errors = synth.chance(ranges::SYNTHETIC_LOT_ERROR_PROBABILITY);
            let cycle_time = synth.draw1(ranges::LOT_CYCLE_TIME);
            let rft_rate = synth.draw1(if has_errors {
                ranges::FAILING_LOT_RFT
            } else {
                ranges::CLEAN_LOT_RFT
            });
            let department = SYNTHETIC_LOT_DEPARTMENTS[synth.index(SYNTHETIC_LOT_DEPARTMENTS.len())];
            let offset = i + cycle_time.round() as u64;
            let release = epoch.checked_add_days(Days::new(offset)).unwrap_or(epoch);

            (
                format!("B{}", SYNTHETIC_LOT_ID_BASE + i),
                LotRecord {
                    rft_rate,
                    cycle_time,
                    has_errors,
                    release_date: release.format(RELEASE_DATE_FORMAT).to_string(),
                    department: department.to_string(),
                    record_count: 1,
                    error_count: u64::from(has_errors),
                    cycle_time_source: CycleTimeSource::Synthesized,
                },
            )
        })
        .collect()
}

fn review_times(
    records: &[ProcessRecord],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> ReviewTimes {
    let reviews: Vec<(Option<NaiveDate>, Reviewer, f64)> = records
        .iter()
        .filter_map(|r| {
            let time = r.review_time.filter(|t| *t > 0.0)?;
            Some((r.activity_date(), r.reviewer?, time))
        })
        .collect();

    if reviews.is_empty() {
        log::debug!("No review times in process data, synthesizing");
        let months = ctx.months.len();
        return ReviewTimes {
            nn: (0..months).map(|_| synth.draw1(ranges::NN_REVIEW_TIME)).collect(),
            pci: (0..months).map(|_| synth.draw1(ranges::PCI_REVIEW_TIME)).collect(),
        };
    }

    let dated = reviews
        .iter()
        .any(|(date, _, _)| date.and_then(|d| ctx.months.bucket(d)).is_some());
    ReviewTimes {
        nn: reviewer_series(&reviews, Reviewer::Nn, dated, ctx, synth),
        pci: reviewer_series(&reviews, Reviewer::Pci, dated, ctx, synth),
    }
}

fn reviewer_series(
    reviews: &[(Option<NaiveDate>, Reviewer, f64)],
    who: Reviewer,
    dated: bool,
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> Vec<f64> {
    let (range, default_time): (FallbackRange, f64) = match who {
        Reviewer::Nn => (ranges::NN_REVIEW_TIME, NN_DEFAULT_REVIEW_TIME),
        Reviewer::Pci => (ranges::PCI_REVIEW_TIME, PCI_DEFAULT_REVIEW_TIME),
    };
    let own: Vec<&(Option<NaiveDate>, Reviewer, f64)> =
        reviews.iter().filter(|(_, r, _)| *r == who).collect();

    if dated {
        let buckets = bucket_by_month(&ctx.months, &own, |(date, _, _)| *date);
        buckets
            .into_iter()
            .map(|bucket| {
                let times: Vec<f64> = bucket.iter().map(|(_, _, t)| *t).collect();
                mean(&times).map_or_else(|| synth.draw1(range), round1)
            })
            .collect()
    } else {
        let times: Vec<f64> = own.iter().map(|(_, _, t)| *t).collect();
        let base = mean(&times).unwrap_or(default_time);
        (0..ctx.months.len())
            .map(|_| round1(base + synth.draw(ranges::REVIEW_JITTER)))
            .collect()
    }
}

/// Default time for a named step without recorded durations.
pub fn default_step_time(step: &str) -> f64 {
    STEP_KEYWORDS
        .iter()
        .find(|(keyword, _)| step.contains(keyword))
        .map_or(DEFAULT_STEP_TIME, |(_, time)| *time)
}

fn step_breakdown(
    records: &[ProcessRecord],
    synth: &mut dyn Synthesizer,
) -> (Vec<StepTime>, Vec<WaitTime>) {
    let mut steps: Vec<&str> = Vec::new();
    for step in records.iter().filter_map(|r| r.step.as_deref()) {
        if !steps.contains(&step) {
            steps.push(step);
        }
    }

    if steps.is_empty() {
        log::debug!("No process steps named, using the default step list");
        let breakdown = DEFAULT_STEPS
            .iter()
            .map(|(step, base)| StepTime {
                step: step.to_string(),
                time: round1(base + synth.draw(ranges::STEP_JITTER)),
            })
            .collect();
        let waits = DEFAULT_STEPS
            .windows(2)
            .map(|pair| WaitTime {
                from: pair[0].0.to_string(),
                to: pair[1].0.to_string(),
                time: synth.draw1(ranges::WAIT_TIME),
            })
            .collect();
        return (breakdown, waits);
    }

    let rows_of = |step: &str| -> Vec<&ProcessRecord> {
        records
            .iter()
            .filter(|r| r.step.as_deref() == Some(step))
            .collect()
    };

    let breakdown = steps
        .iter()
        .map(|step| {
            let durations: Vec<f64> = rows_of(step)
                .iter()
                .filter_map(|r| r.duration)
                .filter(|d| *d > 0.0)
                .collect();
            let time = match mean(&durations) {
                Some(avg) => round1(avg),
                None => round1(default_step_time(step) + synth.draw(ranges::STEP_JITTER)),
            };
            StepTime {
                step: step.to_string(),
                time,
            }
        })
        .collect();

    let waits = steps
        .windows(2)
        .map(|pair| {
            let latest_end = rows_of(pair[0]).iter().filter_map(|r| r.end_date).max();
            let earliest_start = rows_of(pair[1]).iter().filter_map(|r| r.start_date).min();
            let time = match (latest_end, earliest_start) {
                (Some(end), Some(start)) => (start - end).num_days().max(0) as f64,
                _ => synth.draw1(ranges::WAIT_TIME),
            };
            WaitTime {
                from: pair[0].to_string(),
                to: pair[1].to_string(),
                time,
            }
        })
        .collect();

    (breakdown, waits)
}

fn total_cycle_time(
    records: &[ProcessRecord],
    breakdown: &[StepTime],
    waits: &[WaitTime],
    ctx: &AggregationContext,
) -> TotalCycleTime {
    let average = round1(
        breakdown.iter().map(|s| s.time).sum::<f64>() + waits.iter().map(|w| w.time).sum::<f64>(),
    );
    let targets: Vec<f64> = records
        .iter()
        .filter_map(|r| r.target_time)
        .filter(|t| *t > 0.0)
        .collect();

    TotalCycleTime {
        average,
        target: mean(&targets).map_or(ctx.default_cycle_target, round1),
        minimum: round1(average * 0.8),
        maximum: round1(average * 1.5),
    }
}

fn monthly_rft(
    records: &[ProcessRecord],
    lots: &BTreeMap<String, LotRecord>,
    ctx: &AggregationContext,
) -> Vec<MonthlyProcessRft> {
    bucket_by_month(&ctx.months, records, |r| r.activity_date())
        .into_iter()
        .map(|bucket| {
            let mut rows = PassFail::default();
            for record in &bucket {
                rows.record(record.has_error);
            }
            let month_lots: BTreeSet<&str> =
                bucket.iter().filter_map(|r| r.recorded_lot()).collect();
            let failing = month_lots
                .iter()
                .filter(|lot| lots.get(**lot).is_some_and(|l| l.has_errors))
                .count() as u64;
            let lot_count = month_lots.len() as u64;

            MonthlyProcessRft {
                record_rft: (rows.total() > 0).then(|| rows.rft_rate()),
                lot_rft: (lot_count > 0).then(|| percentage(lot_count - failing, lot_count)),
            }
        })
        .collect()
}
