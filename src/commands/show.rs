//! Read the published document the way a dashboard would and print it.

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::config::RftConfig;
use crate::core::AggregateDocument;
use crate::reader::{ArtifactReader, CancellationToken, RefreshOutcome};

pub fn handle_show(config: &RftConfig, json: bool) -> Result<()> {
    let reader = ArtifactReader::from_output(&config.output, config.retry.clone());
    let from = match reader.refresh(&CancellationToken::new()) {
        RefreshOutcome::Loaded { from } => from,
        RefreshOutcome::Failed { error } => anyhow::bail!(error),
        RefreshOutcome::Cancelled => anyhow::bail!("Refresh was cancelled"),
    };
    let document = reader
        .data()
        .ok_or_else(|| anyhow::anyhow!("No document loaded from {}", from))?;

    if json {
        println!("{}", serde_json::to_string_pretty(document.as_ref())?);
    } else {
        log::info!("Loaded document from {}", from);
        print_document(&document);
    }
    Ok(())
}

fn print_document(document: &AggregateDocument) {
    let overview = &document.overview;
    println!(
        "{} {} records, {} lots, overall RFT {:.1}% ({})",
        "RFT".bold(),
        overview.total_records,
        overview.total_lots,
        overview.overall_rft_rate,
        overview.analysis_status.label()
    );
    println!("{}", overview_table(document));
    println!("{}", timeline_table(document));
}

pub fn overview_table(document: &AggregateDocument) -> Table {
    let overview = &document.overview;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    for share in &overview.rft_performance {
        table.add_row(vec![
            Cell::new(format!("RFT {}", share.name)),
            Cell::new(format!("{} ({:.1}%)", share.value, share.percentage)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Lot quality"),
        Cell::new(format!(
            "{} pass / {} fail ({:.1}%, {:+.1})",
            overview.lot_quality.pass,
            overview.lot_quality.fail,
            overview.lot_quality.percentage,
            overview.lot_quality.change
        )),
    ]);
    for issue in &overview.issue_distribution {
        table.add_row(vec![Cell::new(&issue.name), Cell::new(issue.value)]);
    }
    table.add_row(vec![
        Cell::new("Average cycle time"),
        Cell::new(format!(
            "{:.1} days (target {:.1})",
            document.process_metrics.total_cycle_time.average,
            document.process_metrics.total_cycle_time.target
        )),
    ]);
    table
}

pub fn timeline_table(document: &AggregateDocument) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Month", "Record RFT", "Lot RFT"]);
    for point in &document.overview.process_timeline {
        table.add_row(vec![
            Cell::new(&point.month),
            Cell::new(format!("{:.1}", point.record_rft)),
            Cell::new(format!("{:.1}", point.lot_rft)),
        ]);
    }
    table
}
