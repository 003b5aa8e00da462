//! Metric aggregators, one per source type.
//!
//! Each aggregator is a pure function from canonical records to a section of
//! the aggregate document plus the intermediate tallies the overview needs.
//! Whenever a metric cannot be computed from the rows at hand, the
//! aggregator asks the injected [`Synthesizer`](crate::synth::Synthesizer).

pub mod external;
pub mod internal;
pub mod process;
pub mod sentiment;

pub use external::aggregate_external;
pub use internal::{aggregate_internal, InternalAnalysis};
pub use process::{aggregate_process, MonthlyProcessRft, ProcessAnalysis};

use chrono::{Datelike, NaiveDate};

use crate::config::AnalysisSettings;

/// Ordered month labels with their calendar month numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    labels: Vec<String>,
    numbers: Vec<u32>,
}

impl MonthWindow {
    /// Build from labels such as `Jan` or `February`. Labels that do not
    /// name a month never match a date.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let numbers = labels
            .iter()
            .map(|label| {
                label
                    .trim()
                    .parse::<chrono::Month>()
                    .map(|m| m.number_from_month())
                    .unwrap_or(0)
            })
            .collect();
        Self { labels, numbers }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the label whose calendar month matches `date`, year ignored.
    pub fn bucket(&self, date: NaiveDate) -> Option<usize> {
        self.numbers.iter().position(|&n| n == date.month())
    }
}

impl Default for MonthWindow {
    fn default() -> Self {
        Self::new(&["Jan", "Feb", "Mar", "Apr", "May", "Jun"])
    }
}

/// Everything an aggregator needs besides its records.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationContext {
    pub months: MonthWindow,
    pub issue_distribution_top: usize,
    pub form_error_top: usize,
    pub trend_series: usize,
    pub default_cycle_target: f64,
    /// Fallback release date for lots with no dates at all.
    pub as_of: NaiveDate,
}

impl AggregationContext {
    pub fn from_settings(settings: &AnalysisSettings, as_of: NaiveDate) -> Self {
        Self {
            months: MonthWindow::new(&settings.months),
            issue_distribution_top: settings.issue_distribution_top,
            form_error_top: settings.form_error_top,
            trend_series: settings.trend_series,
            default_cycle_target: settings.default_cycle_target,
            as_of,
        }
    }

    /// Default settings as of today.
    pub fn today() -> Self {
        Self::from_settings(&AnalysisSettings::default(), chrono::Local::now().date_naive())
    }
}

/// Split `items` into per-month buckets by `date_of`. Undated items and
/// dates outside the window are skipped.
pub(crate) fn bucket_by_month<'a, T>(
    window: &MonthWindow,
    items: &'a [T],
    date_of: impl Fn(&T) -> Option<NaiveDate>,
) -> Vec<Vec<&'a T>> {
    let mut buckets: Vec<Vec<&T>> = vec![Vec::new(); window.len()];
    for item in items {
        if let Some(i) = date_of(item).and_then(|d| window.bucket(d)) {
            buckets[i].push(item);
        }
    }
    buckets
}
