//! External (customer) RFT aggregation.

use super::{bucket_by_month, sentiment, AggregationContext};
use crate::core::{CategorySentiment, CorrelationPoint, ExternalRecord, ExternalRft, NamedCount};
use crate::synth::{ranges, Synthesizer};
use crate::tally::{PassFail, Tally};

/// Build the external section. `internal_monthly` is the internal record RFT
/// per month, paired with the external rate in the correlation series.
pub fn aggregate_external(
    records: &[ExternalRecord],
    internal_monthly: &[Option<f64>],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> ExternalRft {
    let categories: Tally = records.iter().map(|r| r.category.as_str()).collect();
    let ranked = categories.descending();

    let customer_comments = ranked
        .iter()
        .map(|(category, count)| CategorySentiment {
            category: category.clone(),
            count: *count,
            sentiment: sentiment::category_sentiment(
                category,
                records
                    .iter()
                    .filter(|r| &r.category == category)
                    .filter_map(|r| r.comment.as_deref()),
            ),
        })
        .collect();

    ExternalRft {
        issue_categories: ranked
            .into_iter()
            .map(|(name, value)| NamedCount { name, value })
            .collect(),
        customer_comments,
        correlation_data: correlation(records, internal_monthly, ctx, synth),
    }
}

fn correlation(
    records: &[ExternalRecord],
    internal_monthly: &[Option<f64>],
    ctx: &AggregationContext,
    synth: &mut dyn Synthesizer,
) -> Vec<CorrelationPoint> {
    let buckets = bucket_by_month(&ctx.months, records, |r| r.date);
    ctx.months
        .labels()
        .iter()
        .zip(buckets)
        .enumerate()
        .map(|(i, (month, bucket))| {
            let internal_rft = match internal_monthly.get(i).copied().flatten() {
                Some(rate) => rate,
                None => {
                    log::debug!("No internal rows for {}, synthesizing RFT", month);
                    synth.draw1(ranges::INTERNAL_MONTH_RFT)
                }
            };
            let mut pf = PassFail::default();
            for record in bucket {
                pf.record(record.has_issue);
            }
            let external_rft = if pf.total() > 0 {
                pf.rft_rate()
            } else {
                log::debug!("No external rows for {}, synthesizing RFT", month);
                synth.draw1(ranges::EXTERNAL_MONTH_RFT)
            };
            CorrelationPoint {
                month: month.clone(),
                internal_rft,
                external_rft,
            }
        })
        .collect()
}
