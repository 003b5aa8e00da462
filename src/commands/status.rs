//! Diagnostics: which inputs and artifacts exist and whether they parse.

use anyhow::Result;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RftConfig;
use crate::core::{AggregateDocument, SourceKind};
use crate::io::{load_workbook, RunMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub label: String,
    pub path: PathBuf,
    /// Size in bytes, `None` when the file does not exist.
    pub size: Option<u64>,
    /// Parse summary, or why parsing failed.
    pub detail: Result<String, String>,
}

impl FileCheck {
    pub fn is_ok(&self) -> bool {
        self.size.is_some() && self.detail.is_ok()
    }
}

fn check(label: &str, path: &Path, parse: impl FnOnce(&Path) -> Result<String, String>) -> FileCheck {
    let size = fs::metadata(path).ok().map(|m| m.len());
    let detail = match size {
        Some(_) => parse(path),
        None => Err("missing".to_string()),
    };
    FileCheck {
        label: label.to_string(),
        path: path.to_path_buf(),
        size,
        detail,
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Check every configured source and artifact.
pub fn collect_status(config: &RftConfig) -> Vec<FileCheck> {
    let mut checks: Vec<FileCheck> = SourceKind::ALL
        .iter()
        .map(|&kind| {
            check(kind.as_str(), config.sources.path_for(kind), |path| {
                load_workbook(path)
                    .map(|wb| format!("{} rows in {} sheet(s)", wb.row_count(), wb.sheets.len()))
                    .map_err(|e| e.to_string())
            })
        })
        .collect();

    let document_check = |path: &Path| {
        parse_json::<AggregateDocument>(path).map(|doc| {
            format!(
                "{} records, {} lots, {}",
                doc.overview.total_records,
                doc.overview.total_lots,
                doc.overview.analysis_status.label()
            )
        })
    };
    checks.push(check("primary artifact", &config.output.primary_path(), document_check));
    checks.push(check("fallback artifact", &config.output.fallback_path(), document_check));
    checks.push(check("metadata", &config.output.metadata_path(), |path| {
        parse_json::<RunMetadata>(path).map(|m| format!("last updated {}", m.last_updated.to_rfc3339()))
    }));
    checks
}

pub fn handle_status(config: &RftConfig) -> Result<()> {
    for check in collect_status(config) {
        let mark = if check.is_ok() { "✓".green() } else { "✗".red() };
        let size = check
            .size
            .map(|s| format!("{} bytes", s))
            .unwrap_or_else(|| "-".to_string());
        let detail = match &check.detail {
            Ok(summary) => summary.normal(),
            Err(reason) => reason.yellow(),
        };
        println!(
            "{} {:<18} {} ({}) {}",
            mark,
            check.label,
            check.path.display(),
            size,
            detail
        );
    }
    Ok(())
}
