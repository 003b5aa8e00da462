//! Error types for the filesystem edges of the pipeline.
//!
//! Aggregation itself never fails. These errors describe why a source could
//! not be loaded, why an artifact could not be written, or why a reader
//! could not retrieve one.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::normalize::WorkbookShapeError;

/// Why a decoded workbook could not feed the pipeline.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed workbook JSON in {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected workbook layout in {}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: WorkbookShapeError,
    },

    #[error("no rows in {}", path.display())]
    Empty { path: PathBuf },
}

impl SourceError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourceError::NotFound { path }
            | SourceError::Unreadable { path, .. }
            | SourceError::Malformed { path, .. }
            | SourceError::Shape { path, .. }
            | SourceError::Empty { path } => path,
        }
    }

    /// Message followed by every underlying cause, `outer: inner: ...`.
    pub fn with_causes(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        message
    }
}

/// Failure writing an artifact.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize {what}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure retrieving the aggregate artifact.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("artifact not found at {location}")]
    NotFound { location: String },

    #[error("failed to read artifact at {location}")]
    Unreadable {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("artifact at {location} is not a valid aggregate document")]
    InvalidJson {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Missing artifacts are retried like any other failure; only the
    /// message differs.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_source_error_keeps_path_and_cause() {
        let err = SourceError::Unreadable {
            path: PathBuf::from("data/internal.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to read data/internal.json");
        assert_eq!(err.path(), std::path::Path::new("data/internal.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_with_causes_appends_underlying_error() {
        let err = SourceError::Unreadable {
            path: PathBuf::from("data/internal.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.with_causes(), "failed to read data/internal.json: denied");

        let missing = SourceError::NotFound {
            path: PathBuf::from("process.json"),
        };
        assert_eq!(missing.with_causes(), missing.to_string());
    }

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::NotFound {
            location: "public/data/complete-data.json".into(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("complete-data.json"));
    }
}
