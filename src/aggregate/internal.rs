//! Internal RFT aggregation: department pass/fail, form errors, Pareto.

use std::collections::BTreeMap;

use super::{bucket_by_month, AggregationContext};
use crate::core::metrics::percentage;
use crate::core::{
    DepartmentPerformance, FormError, FormErrorTrend, InternalRecord, InternalRft, ParetoEntry,
    Trend,
};
use crate::normalize::fields::DEFAULT_FORM_TYPE;
use crate::tally::{PassFail, PassFailTally, Tally};

/// Internal section plus the tallies the overview composes from.
#[derive(Debug, Clone)]
pub struct InternalAnalysis {
    pub section: InternalRft,
    /// Pass/fail over every internal record.
    pub totals: PassFail,
    /// Error types of failing records.
    pub error_types: Tally,
    /// Record-level RFT per month; `None` for months without dated rows.
    pub monthly_rft: Vec<Option<f64>>,
}

pub fn aggregate_internal(records: &[InternalRecord], ctx: &AggregationContext) -> InternalAnalysis {
    let mut departments = PassFailTally::new();
    for record in records {
        departments.record(&record.department, record.has_error);
    }

    let failing: Vec<&InternalRecord> = records.iter().filter(|r| r.has_error).collect();
    let error_types: Tally = failing.iter().map(|r| r.error_type.as_str()).collect();

    let group_by_form = records.iter().any(|r| r.form_type.is_some());
    let form_key = |r: &InternalRecord| -> String {
        if group_by_form {
            r.form_type
                .clone()
                .unwrap_or_else(|| DEFAULT_FORM_TYPE.to_string())
        } else {
            r.error_type.clone()
        }
    };
    let form_names: Vec<String> = failing.iter().map(|&r| form_key(r)).collect();
    let forms: Tally = form_names.iter().map(String::as_str).collect();

    let monthly_failures = monthly_form_counts(&failing, ctx, &form_key);
    let form_errors = form_errors(&forms, monthly_failures.as_deref(), ctx.form_error_top);
    let form_error_trends = form_error_trends(&form_errors, monthly_failures.as_deref(), ctx);

    let section = InternalRft {
        department_performance: departments
            .in_order()
            .map(|(department, pf)| DepartmentPerformance {
                department: department.to_string(),
                pass: pf.pass,
                fail: pf.fail,
                rft_rate: pf.rft_rate(),
            })
            .collect(),
        form_errors,
        error_type_pareto: pareto(&error_types),
        form_error_trends,
    };

    InternalAnalysis {
        section,
        totals: departments.totals(),
        error_types,
        monthly_rft: monthly_rft(records, ctx),
    }
}

/// Pure function building a Pareto breakdown: sort descending first, then
/// accumulate in that order.
pub fn pareto(tally: &Tally) -> Vec<ParetoEntry> {
    let mut running = 0;
    tally
        .descending()
        .into_iter()
        .map(|(kind, count)| {
            running += count;
            ParetoEntry {
                kind,
                count,
                cumulative: running,
            }
        })
        .collect()
}

fn monthly_rft(records: &[InternalRecord], ctx: &AggregationContext) -> Vec<Option<f64>> {
    bucket_by_month(&ctx.months, records, |r| r.date)
        .into_iter()
        .map(|bucket| {
            let mut pf = PassFail::default();
            for record in bucket {
                pf.record(record.has_error);
            }
            (pf.total() > 0).then(|| pf.rft_rate())
        })
        .collect()
}

/// Per-month form error tallies, `None` when no failing record is dated
/// inside the window.
fn monthly_form_counts(
    failing: &[&InternalRecord],
    ctx: &AggregationContext,
    form_key: &dyn Fn(&InternalRecord) -> String,
) -> Option<Vec<Tally>> {
    let buckets = bucket_by_month(&ctx.months, failing, |r| r.date);
    if buckets.iter().all(Vec::is_empty) {
        return None;
    }
    Some(
        buckets
            .into_iter()
            .map(|bucket| {
                let names: Vec<String> = bucket.into_iter().map(|&r| form_key(r)).collect();
                names.iter().map(String::as_str).collect()
            })
            .collect(),
    )
}

fn form_errors(forms: &Tally, monthly: Option<&[Tally]>, top: usize) -> Vec<FormError> {
    let total = forms.total();
    forms
        .top(top)
        .into_iter()
        .map(|(name, errors)| FormError {
            trend: monthly.map_or(Trend::Flat, |m| trend_of(&name, m)),
            percentage: percentage(errors, total),
            name,
            errors,
        })
        .collect()
}

/// Compare the second half of the window against the first.
fn trend_of(name: &str, monthly: &[Tally]) -> Trend {
    let half = monthly.len() / 2;
    let first: u64 = monthly[..half].iter().map(|t| t.get(name)).sum();
    let second: u64 = monthly[half..].iter().map(|t| t.get(name)).sum();
    match second.cmp(&first) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Flat,
    }
}

fn form_error_trends(
    form_errors: &[FormError],
    monthly: Option<&[Tally]>,
    ctx: &AggregationContext,
) -> Vec<FormErrorTrend> {
    let series: Vec<&FormError> = form_errors.iter().take(ctx.trend_series).collect();
    ctx.months
        .labels()
        .iter()
        .enumerate()
        .map(|(i, month)| FormErrorTrend {
            month: month.clone(),
            counts: series
                .iter()
                .map(|form| {
                    let count = match monthly {
                        Some(m) => m[i].get(&form.name),
                        None => decayed(form.errors, i),
                    };
                    (form.name.clone(), count)
                })
                .collect::<BTreeMap<_, _>>(),
        })
        .collect()
}

/// Undated trend point: `round(errors × (1 − 0.05·i))`, floored at zero.
fn decayed(errors: u64, month_index: usize) -> u64 {
    (errors as f64 * (1.0 - 0.05 * month_index as f64)).round().max(0.0) as u64
}
