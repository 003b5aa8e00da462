//! Canonical records: the fixed-shape projection of a raw spreadsheet row.
//!
//! Every attribute is always present. Absent source fields are replaced by
//! the defaults documented on each field, so aggregators never look at raw
//! key names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which decoded workbook a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Internal,
    External,
    Process,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Internal, SourceKind::External, SourceKind::Process];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Internal => "internal",
            SourceKind::External => "external",
            SourceKind::Process => "process",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal quality record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalRecord {
    /// `ID`; default `INT-<6000 + ordinal>`.
    pub id: String,
    /// `Department`; default `Unknown`.
    pub department: String,
    /// True when any failure indicator field carries a failing value.
    pub has_error: bool,
    /// `ErrorType`/`IssueType`; default `Unspecified`.
    pub error_type: String,
    /// `FormType`/`DocumentType`; `None` when the row names no form.
    pub form_type: Option<String>,
    /// `Date`/`Timestamp`; `None` when missing or unparseable.
    pub date: Option<NaiveDate>,
}

/// External (customer) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalRecord {
    /// `ID`; default `EXT-<8000 + ordinal>`.
    pub id: String,
    /// `Customer`; default `Unknown`.
    pub customer: String,
    /// `Category`/`IssueCategory`/`IssueType`; default `Other`.
    pub category: String,
    /// `Comments`/`Comment`/`CustomerFeedback`/`Feedback`, trimmed, non-empty.
    pub comment: Option<String>,
    /// True when any failure indicator field carries a failing value.
    pub has_issue: bool,
    pub date: Option<NaiveDate>,
}

/// Reviewing party for review-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reviewer {
    Nn,
    Pci,
}

impl Reviewer {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NN" => Some(Reviewer::Nn),
            "PCI" => Some(Reviewer::Pci),
            _ => None,
        }
    }
}

/// Commercial process record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    /// `Lot`/`LotNumber`/`LotID`/`BatchID`; default `L<1000 + ordinal>`.
    pub lot: String,
    /// True when `lot` is the ordinal placeholder rather than a recorded id.
    pub lot_is_placeholder: bool,
    /// `Department`; `None` when absent (lots default to `Production`).
    pub department: Option<String>,
    /// `ProcessStep`/`Step`.
    pub step: Option<String>,
    /// `Duration`/`Time`, in days.
    pub duration: Option<f64>,
    /// `CycleTime`, in days.
    pub cycle_time: Option<f64>,
    /// `StartDate`, falling back to `Date`.
    pub start_date: Option<NaiveDate>,
    /// `EndDate`/`FinishDate`.
    pub end_date: Option<NaiveDate>,
    /// `ReleaseDate`/`CompletionDate`.
    pub release_date: Option<NaiveDate>,
    /// `ReviewType`/`ReviewerType`/`Reviewer`, else a department named NN/PCI.
    pub reviewer: Option<Reviewer>,
    /// `ReviewTime`, in days.
    pub review_time: Option<f64>,
    /// `TargetTime`/`Target`, in days.
    pub target_time: Option<f64>,
    pub has_error: bool,
}

impl ProcessRecord {
    /// Date used for month bucketing.
    pub fn activity_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Real lot id, if the row recorded one.
    pub fn recorded_lot(&self) -> Option<&str> {
        (!self.lot_is_placeholder).then_some(self.lot.as_str())
    }
}
