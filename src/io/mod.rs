//! Filesystem edges: workbook loading and artifact writing.

pub mod output;
pub mod sources;

pub use output::{write_artifacts, RunMetadata, SourceFile, WrittenArtifacts};
pub use sources::{load_inputs, load_workbook};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
