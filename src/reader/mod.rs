//! Consumer-facing read interface for the aggregate artifact.
//!
//! An [`ArtifactReader`] holds the most recently retrieved document and a
//! small amount of status for display. [`ArtifactReader::refresh`] re-reads
//! the artifact (it never re-aggregates): the primary location is retried
//! with the configured backoff, then the fallback copy is tried once. A
//! successful read replaces the held document; a failed one keeps it and
//! records the error; a cancelled one leaves the reader exactly as it was.

mod cancel;
pub mod source;

pub use cancel::CancellationToken;
pub use source::{ArtifactSource, FileArtifactSource};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::{OutputConfig, RetryConfig};
use crate::core::AggregateDocument;
use crate::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Loading,
    Success,
    Error,
}

/// Point-in-time view of the reader.
#[derive(Debug, Clone, Default)]
pub struct ReaderSnapshot {
    pub is_loading: bool,
    pub error: Option<String>,
    pub data: Option<Arc<AggregateDocument>>,
    pub file_status: BTreeMap<String, FileStatus>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A document was read from the named location.
    Loaded { from: String },
    /// Every location failed; the previous document is kept.
    Failed { error: String },
    /// The token was cancelled; nothing changed.
    Cancelled,
}

pub struct ArtifactReader<S: ArtifactSource = FileArtifactSource> {
    primary: S,
    fallback: Option<S>,
    retry: RetryConfig,
    state: RwLock<ReaderSnapshot>,
}

impl ArtifactReader<FileArtifactSource> {
    /// Reader over the configured primary and fallback artifact files.
    pub fn from_output(output: &OutputConfig, retry: RetryConfig) -> Self {
        Self::new(
            FileArtifactSource::new(output.primary.display().to_string(), output.primary_path()),
            Some(FileArtifactSource::new(
                output.fallback.display().to_string(),
                output.fallback_path(),
            )),
            retry,
        )
    }
}

impl<S: ArtifactSource> ArtifactReader<S> {
    pub fn new(primary: S, fallback: Option<S>, retry: RetryConfig) -> Self {
        let file_status = std::iter::once(&primary)
            .chain(fallback.as_ref())
            .map(|s| (s.name().to_string(), FileStatus::Pending))
            .collect();
        Self {
            primary,
            fallback,
            retry,
            state: RwLock::new(ReaderSnapshot {
                file_status,
                ..Default::default()
            }),
        }
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        self.state.read().clone()
    }

    pub fn data(&self) -> Option<Arc<AggregateDocument>> {
        self.state.read().data.clone()
    }

    /// Re-read the artifact. Blocks for the duration of retries.
    pub fn refresh(&self, token: &CancellationToken) -> RefreshOutcome {
        if token.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }

        let previous = {
            let mut state = self.state.write();
            let previous = state.clone();
            state.is_loading = true;
            state.error = None;
            self.set_status(&mut state, self.primary.name(), FileStatus::Loading);
            previous
        };

        let primary = match self.fetch_with_retry(&self.primary, token) {
            Some(result) => result,
            None => return self.restore(previous),
        };

        let (result, statuses) = match primary {
            Ok(document) => (
                Ok((self.primary.name().to_string(), document)),
                vec![(self.primary.name(), FileStatus::Success)],
            ),
            Err(primary_err) => {
                log::warn!("Primary artifact unavailable: {}", primary_err);
                let mut statuses = vec![(self.primary.name(), FileStatus::Error)];
                let result = match &self.fallback {
                    Some(fallback) => match fallback.fetch() {
                        Ok(document) => {
                            log::info!("Loaded artifact from fallback {}", fallback.name());
                            statuses.push((fallback.name(), FileStatus::Success));
                            Ok((fallback.name().to_string(), document))
                        }
                        Err(fallback_err) => {
                            statuses.push((fallback.name(), FileStatus::Error));
                            Err(format!(
                                "Failed to load data: {}; fallback: {}",
                                primary_err, fallback_err
                            ))
                        }
                    },
                    None => Err(format!("Failed to load data: {}", primary_err)),
                };
                (result, statuses)
            }
        };

        let mut state = self.state.write();
        if token.is_cancelled() {
            *state = previous;
            return RefreshOutcome::Cancelled;
        }
        for (name, status) in statuses {
            self.set_status(&mut state, name, status);
        }
        state.is_loading = false;
        state.last_updated = Some(Utc::now());

        match result {
            Ok((from, document)) => {
                state.error = None;
                state.data = Some(Arc::new(document));
                RefreshOutcome::Loaded { from }
            }
            Err(error) => {
                state.error = Some(error.clone());
                RefreshOutcome::Failed { error }
            }
        }
    }

    fn set_status(&self, state: &mut ReaderSnapshot, name: &str, status: FileStatus) {
        state.file_status.insert(name.to_string(), status);
    }

    fn restore(&self, previous: ReaderSnapshot) -> RefreshOutcome {
        log::debug!("Artifact refresh cancelled");
        *self.state.write() = previous;
        RefreshOutcome::Cancelled
    }

    /// Fetch with the retry policy. `None` when cancelled.
    fn fetch_with_retry(
        &self,
        source: &S,
        token: &CancellationToken,
    ) -> Option<Result<AggregateDocument, FetchError>> {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            if token.is_cancelled() {
                return None;
            }
            match source.fetch() {
                Ok(document) => return Some(Ok(document)),
                Err(e) if self.retry.should_retry(attempt, started.elapsed()) => {
                    attempt += 1;
                    let delay = self.retry.delay_for_attempt(attempt);
                    log::debug!(
                        "Fetch of {} failed ({}), retry {} of {} in {:?}",
                        source.name(),
                        e,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    if !token.sleep(delay) {
                        return None;
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
