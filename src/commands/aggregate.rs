use anyhow::{Context, Result};
use chrono::{Local, Utc};
use colored::*;

use crate::aggregate::AggregationContext;
use crate::config::RftConfig;
use crate::io::{self, WrittenArtifacts};
use crate::pipeline::{self, PipelineRun, SourceOutcome};
use crate::synth::SeededSynthesizer;

/// Load sources, aggregate, and publish the artifacts.
pub fn handle_aggregate(config: &RftConfig) -> Result<PipelineRun> {
    config.analysis.validate()?;

    let ctx = AggregationContext::from_settings(&config.analysis, Local::now().date_naive());
    let inputs = io::load_inputs(&config.sources);
    let mut synth = SeededSynthesizer::new(config.analysis.seed);
    let run = pipeline::run(&inputs, &ctx, &mut synth);

    let written = io::write_artifacts(&run, &config.output, &config.sources, Utc::now())
        .context("Failed to publish aggregate document")?;
    print_summary(&run, &written);
    Ok(run)
}

fn print_summary(run: &PipelineRun, written: &WrittenArtifacts) {
    for report in &run.sources {
        match &report.outcome {
            SourceOutcome::Loaded { rows, sheets } => println!(
                "{} {}: {} rows from {} sheet(s)",
                "✓".green(),
                report.kind,
                rows,
                sheets
            ),
            SourceOutcome::Unavailable { reason } => {
                println!("{} {}: {}", "✗".yellow(), report.kind, reason)
            }
        }
    }

    let status = run.status().label();
    let status = match run.processed_count() {
        3 => status.green(),
        0 => status.red(),
        _ => status.yellow(),
    };
    println!(
        "Processed {} of 3 sources: {}",
        run.processed_count(),
        status.bold()
    );
    println!("Saved {}", written.primary.display());
    println!("Saved {}", written.fallback.display());
    println!("Saved {}", written.metadata.display());
}
