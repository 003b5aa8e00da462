//! Where an [`ArtifactReader`](super::ArtifactReader) fetches documents from.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::AggregateDocument;
use crate::errors::FetchError;

/// A location holding a serialized aggregate document.
pub trait ArtifactSource: Send + Sync {
    /// Key used in the reader's per-file status map.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<AggregateDocument, FetchError>;
}

/// Artifact stored on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifactSource {
    name: String,
    path: PathBuf,
}

impl FileArtifactSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactSource for FileArtifactSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<AggregateDocument, FetchError> {
        let location = self.path.display().to_string();
        let contents = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                location: location.clone(),
            },
            _ => FetchError::Unreadable {
                location: location.clone(),
                source,
            },
        })?;
        serde_json::from_str(&contents).map_err(|source| FetchError::InvalidJson { location, source })
    }
}
