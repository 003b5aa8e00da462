//! Row normalization: raw spreadsheet rows → canonical records.
//!
//! Alias resolution happens here and only here. Each normalizer is total:
//! any row, however sparse, yields a record with every attribute set, so
//! aggregators never branch on column names.

pub mod fields;
pub mod values;
pub mod workbook;

pub use workbook::{RawRow, Sheet, Workbook, WorkbookShapeError};

use crate::core::{ExternalRecord, InternalRecord, ProcessRecord, Reviewer};
use fields::{external, internal, process, FAILURE_FLAGS};

/// Normalize an internal quality row. `ordinal` is the row's position in
/// its workbook and seeds the placeholder id.
pub fn normalize_internal(row: &RawRow, ordinal: usize) -> InternalRecord {
    InternalRecord {
        id: row
            .text(internal::ID)
            .unwrap_or_else(|| format!("INT-{}", fields::INTERNAL_ID_BASE + ordinal)),
        department: row
            .text(internal::DEPARTMENT)
            .unwrap_or_else(|| fields::DEFAULT_DEPARTMENT.to_string()),
        has_error: row.any_failure(FAILURE_FLAGS),
        error_type: row
            .text(internal::ERROR_TYPE)
            .unwrap_or_else(|| fields::DEFAULT_ERROR_TYPE.to_string()),
        form_type: row.text(internal::FORM_TYPE),
        date: row.date(internal::DATE),
    }
}

pub fn normalize_external(row: &RawRow, ordinal: usize) -> ExternalRecord {
    ExternalRecord {
        id: row
            .text(external::ID)
            .unwrap_or_else(|| format!("EXT-{}", fields::EXTERNAL_ID_BASE + ordinal)),
        customer: row
            .text(external::CUSTOMER)
            .unwrap_or_else(|| fields::DEFAULT_CUSTOMER.to_string()),
        category: row
            .text(external::CATEGORY)
            .unwrap_or_else(|| fields::DEFAULT_CATEGORY.to_string()),
        comment: row.text(external::COMMENT),
        has_issue: row.any_failure(FAILURE_FLAGS),
        date: row.date(external::DATE),
    }
}

pub fn normalize_process(row: &RawRow, ordinal: usize) -> ProcessRecord {
    let recorded_lot = row.text(process::LOT);
    let department = row.text(process::DEPARTMENT);
    let reviewer = row
        .text(process::REVIEWER)
        .and_then(|r| Reviewer::parse(&r))
        .or_else(|| department.as_deref().and_then(Reviewer::parse));

    ProcessRecord {
        lot_is_placeholder: recorded_lot.is_none(),
        lot: recorded_lot
            .unwrap_or_else(|| format!("L{}", fields::LOT_PLACEHOLDER_BASE + ordinal)),
        department,
        step: row.text(process::STEP),
        duration: row.number(process::DURATION),
        cycle_time: row.number(process::CYCLE_TIME),
        start_date: row.date(process::START_DATE),
        end_date: row.date(process::END_DATE),
        release_date: row.date(process::RELEASE_DATE),
        reviewer,
        review_time: row.number(process::REVIEW_TIME),
        target_time: row.number(process::TARGET_TIME),
        has_error: row.any_failure(FAILURE_FLAGS),
    }
}

/// Normalize every row of a workbook in sheet order.
pub fn normalize_workbook<T>(workbook: &Workbook, normalize: fn(&RawRow, usize) -> T) -> Vec<T> {
    workbook
        .rows()
        .enumerate()
        .map(|(ordinal, row)| normalize(row, ordinal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => RawRow::new(map),
            _ => panic!("row fixture must be an object"),
        }
    }

    #[test]
    fn test_internal_defaults_for_empty_row() {
        let record = normalize_internal(&RawRow::default(), 3);
        assert_eq!(record.id, "INT-6003");
        assert_eq!(record.department, "Unknown");
        assert_eq!(record.error_type, "Unspecified");
        assert!(!record.has_error);
        assert_eq!(record.form_type, None);
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_internal_failure_from_any_flag() {
        let failed = normalize_internal(&row(json!({"Department": "A", "Status": "Fail"})), 0);
        assert!(failed.has_error);
        let flagged = normalize_internal(&row(json!({"Error": "Yes", "Status": "Pass"})), 0);
        assert!(flagged.has_error);
        let passed = normalize_internal(&row(json!({"Department": "A", "Status": "Pass"})), 1);
        assert!(!passed.has_error);
        assert_eq!(passed.department, "A");
    }

    #[test]
    fn test_internal_alias_order() {
        let record = normalize_internal(
            &row(json!({"IssueType": "Late Entry", "DocumentType": "Batch Record"})),
            0,
        );
        assert_eq!(record.error_type, "Late Entry");
        assert_eq!(record.form_type.as_deref(), Some("Batch Record"));
    }

    #[test]
    fn test_unparseable_date_is_dropped_not_fatal() {
        let record = normalize_internal(&row(json!({"Date": "Q3-ish"})), 0);
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_external_comment_and_category_aliases() {
        let record = normalize_external(
            &row(json!({"IssueCategory": "Quality", "CustomerFeedback": "great service"})),
            2,
        );
        assert_eq!(record.id, "EXT-8002");
        assert_eq!(record.category, "Quality");
        assert_eq!(record.comment.as_deref(), Some("great service"));
        assert_eq!(record.customer, "Unknown");
    }

    #[test]
    fn test_external_defaults_category_to_other() {
        let record = normalize_external(&row(json!({"Comments": "  "})), 0);
        assert_eq!(record.category, "Other");
        assert_eq!(record.comment, None);
    }

    #[test]
    fn test_process_lot_placeholder_uses_ordinal() {
        let record = normalize_process(&row(json!({"Step": "Assembly"})), 7);
        assert_eq!(record.lot, "L1007");
        assert!(record.lot_is_placeholder);
        assert_eq!(record.recorded_lot(), None);
    }

    #[test]
    fn test_process_lot_alias_order() {
        let record = normalize_process(&row(json!({"LotNumber": "B2", "BatchID": "X9"})), 0);
        assert_eq!(record.lot, "B2");
        assert_eq!(record.recorded_lot(), Some("B2"));
    }

    #[test]
    fn test_process_dates_and_numbers() {
        let record = normalize_process(
            &row(json!({
                "Lot": "B1",
                "StartDate": "2024-01-01",
                "ReleaseDate": "2024-01-20",
                "CycleTime": "12.5",
                "ReviewTime": 3
            })),
            0,
        );
        assert_eq!(record.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(record.release_date, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(record.cycle_time, Some(12.5));
        assert_eq!(record.review_time, Some(3.0));
    }

    #[test]
    fn test_process_start_date_falls_back_to_date() {
        let record = normalize_process(&row(json!({"Date": "2024-02-03"})), 0);
        assert_eq!(record.activity_date(), NaiveDate::from_ymd_opt(2024, 2, 3));
    }

    #[test]
    fn test_process_reviewer_from_department() {
        let record = normalize_process(&row(json!({"Department": "PCI"})), 0);
        assert_eq!(record.reviewer, Some(Reviewer::Pci));
        let explicit = normalize_process(&row(json!({"Department": "PCI", "ReviewType": "NN"})), 0);
        assert_eq!(explicit.reviewer, Some(Reviewer::Nn));
    }

    #[test]
    fn test_normalize_workbook_numbers_rows_across_sheets() {
        let wb = Workbook::from_value(json!({
            "First": [{"Step": "A"}],
            "Second": [{"Step": "B"}, {"Lot": "B1"}]
        }))
        .unwrap();
        let records = normalize_workbook(&wb, normalize_process);
        let lots: Vec<_> = records.iter().map(|r| r.lot.as_str()).collect();
        assert_eq!(lots, vec!["L1000", "L1001", "B1"]);
    }
}
