//! Loading decoded workbooks from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::SourcesConfig;
use crate::errors::SourceError;
use crate::normalize::Workbook;
use crate::pipeline::PipelineInputs;

/// Read one decoded workbook. A file that parses but holds no rows is an
/// [`SourceError::Empty`].
pub fn load_workbook(path: &Path) -> Result<Workbook, SourceError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| SourceError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let workbook = Workbook::from_value(value).map_err(|source| SourceError::Shape {
        path: path.to_path_buf(),
        source,
    })?;

    for sheet in &workbook.sheets {
        log::debug!("{}: sheet '{}' has {} rows", path.display(), sheet.name, sheet.rows.len());
    }

    if workbook.row_count() == 0 {
        return Err(SourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(workbook)
}

/// Load all three configured sources. Failures are kept per source.
pub fn load_inputs(sources: &SourcesConfig) -> PipelineInputs {
    PipelineInputs::new(
        load_workbook(&sources.internal),
        load_workbook(&sources.external),
        load_workbook(&sources.process),
    )
}
