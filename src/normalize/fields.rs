//! Ordered alias lists per logical attribute.
//!
//! The first alias holding a usable value wins. Lists are ordered by how
//! authoritative the column is in the exports seen so far.

pub mod internal {
    pub const ID: &[&str] = &["ID", "RecordID"];
    pub const DEPARTMENT: &[&str] = &["Department", "Dept"];
    pub const ERROR_TYPE: &[&str] = &["ErrorType", "IssueType", "Error Type"];
    pub const FORM_TYPE: &[&str] = &["FormType", "DocumentType", "Form Type"];
    pub const DATE: &[&str] = &["Date", "Timestamp", "RecordDate"];
}

pub mod external {
    pub const ID: &[&str] = &["ID", "RecordID"];
    pub const CUSTOMER: &[&str] = &["Customer", "CustomerName"];
    pub const CATEGORY: &[&str] = &["Category", "IssueCategory", "IssueType"];
    pub const COMMENT: &[&str] = &["Comments", "Comment", "CustomerFeedback", "Feedback"];
    pub const DATE: &[&str] = &["Date", "Timestamp"];
}

pub mod process {
    pub const LOT: &[&str] = &["Lot", "LotNumber", "LotID", "BatchID"];
    pub const DEPARTMENT: &[&str] = &["Department", "Dept"];
    pub const STEP: &[&str] = &["ProcessStep", "Step"];
    pub const DURATION: &[&str] = &["Duration", "Time"];
    pub const CYCLE_TIME: &[&str] = &["CycleTime"];
    pub const START_DATE: &[&str] = &["StartDate", "Date"];
    pub const END_DATE: &[&str] = &["EndDate", "FinishDate"];
    pub const RELEASE_DATE: &[&str] = &["ReleaseDate", "CompletionDate"];
    pub const REVIEWER: &[&str] = &["ReviewType", "ReviewerType", "Reviewer"];
    pub const REVIEW_TIME: &[&str] = &["ReviewTime"];
    pub const TARGET_TIME: &[&str] = &["TargetTime", "Target"];
}

/// Fields whose failing value marks a row as not right-first-time. Any one
/// of them is enough.
pub const FAILURE_FLAGS: &[&str] = &["Error", "Status", "Result", "HasIssue", "HasError"];

pub const DEFAULT_DEPARTMENT: &str = "Unknown";
pub const DEFAULT_ERROR_TYPE: &str = "Unspecified";
pub const DEFAULT_FORM_TYPE: &str = "Standard Form";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_CUSTOMER: &str = "Unknown";
pub const DEFAULT_LOT_DEPARTMENT: &str = "Production";

/// Ordinal offsets for synthesized identifiers.
pub const INTERNAL_ID_BASE: usize = 6000;
pub const EXTERNAL_ID_BASE: usize = 8000;
pub const LOT_PLACEHOLDER_BASE: usize = 1000;
