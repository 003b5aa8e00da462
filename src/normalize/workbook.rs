//! Decoded workbook input: sheet name → ordered row mappings.

use serde_json::{Map, Value};

use super::values;

/// One spreadsheet row as decoded, keys exactly as they appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Value of a key matched exactly, then ignoring ASCII case and
    /// surrounding whitespace.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).or_else(|| {
            self.0
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    /// First alias holding a usable value. Nulls and blank strings count as
    /// absent so a later alias can still supply the attribute.
    pub fn resolve(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|value| is_present(value))
    }

    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find_map(values::text)
    }

    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find_map(values::number)
    }

    pub fn date(&self, aliases: &[&str]) -> Option<chrono::NaiveDate> {
        self.resolve(aliases).and_then(values::date)
    }

    /// True if any of the flag fields carries a failing value.
    pub fn any_failure(&self, flags: &[&str]) -> bool {
        flags
            .iter()
            .filter_map(|flag| self.get(flag))
            .any(values::is_failure)
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// A decoded spreadsheet file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkbookShapeError {
    /// The document is neither a sheet map nor a row array.
    #[error("expected an object of sheets or an array of rows, found {0}")]
    UnexpectedRoot(&'static str),
}

impl Workbook {
    pub fn single_sheet(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            sheets: vec![Sheet {
                name: name.into(),
                rows,
            }],
        }
    }

    /// Build from decoded JSON. Sheets that are not arrays and rows that are
    /// not objects are skipped, as the decoder emits them for chart sheets
    /// and blank lines.
    pub fn from_value(value: Value) -> Result<Self, WorkbookShapeError> {
        match value {
            Value::Object(sheets) => Ok(Self {
                sheets: sheets
                    .into_iter()
                    .filter_map(|(name, rows)| match rows {
                        Value::Array(rows) => Some(Sheet {
                            name,
                            rows: object_rows(rows),
                        }),
                        _ => {
                            log::debug!("Skipping non-tabular sheet '{}'", name);
                            None
                        }
                    })
                    .collect(),
            }),
            Value::Array(rows) => Ok(Self::single_sheet("Sheet1", object_rows(rows))),
            Value::Null => Err(WorkbookShapeError::UnexpectedRoot("null")),
            Value::Bool(_) => Err(WorkbookShapeError::UnexpectedRoot("a boolean")),
            Value::Number(_) => Err(WorkbookShapeError::UnexpectedRoot("a number")),
            Value::String(_) => Err(WorkbookShapeError::UnexpectedRoot("a string")),
        }
    }

    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }

    /// All rows across sheets, in sheet order.
    pub fn rows(&self) -> impl Iterator<Item = &RawRow> {
        self.sheets.iter().flat_map(|s| s.rows.iter())
    }
}

fn object_rows(rows: Vec<Value>) -> Vec<RawRow> {
    rows.into_iter()
        .filter_map(|row| match row {
            Value::Object(fields) => Some(RawRow::new(fields)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => RawRow::new(map),
            _ => panic!("row fixture must be an object"),
        }
    }

    #[test]
    fn test_get_falls_back_to_case_insensitive_match() {
        let r = row(json!({"department ": "QA"}));
        assert_eq!(r.get("Department"), Some(&json!("QA")));
        assert_eq!(r.get("Status"), None);
    }

    #[test]
    fn test_resolve_skips_blank_aliases() {
        let r = row(json!({"Lot": "", "LotNumber": "B7"}));
        assert_eq!(r.resolve(&["Lot", "LotNumber"]), Some(&json!("B7")));
        assert_eq!(r.text(&["Lot", "LotNumber"]), Some("B7".to_string()));
    }

    #[test]
    fn test_any_failure_is_an_or_across_flags() {
        let r = row(json!({"Status": "Pass", "HasIssue": "Yes"}));
        assert!(r.any_failure(&["Error", "Status", "HasIssue"]));
        let clean = row(json!({"Status": "Pass", "Result": "OK"}));
        assert!(!clean.any_failure(&["Error", "Status", "Result"]));
    }

    #[test]
    fn test_workbook_from_sheet_map_keeps_sheet_order() {
        let wb = Workbook::from_value(json!({
            "Zeta": [{"A": 1}],
            "Alpha": [{"A": 2}, {"A": 3}],
            "Chart": "not a table"
        }))
        .unwrap();
        let names: Vec<_> = wb.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(wb.row_count(), 3);
    }

    #[test]
    fn test_workbook_from_bare_rows() {
        let wb = Workbook::from_value(json!([{"A": 1}, "junk", {"A": 2}])).unwrap();
        assert_eq!(wb.sheets.len(), 1);
        assert_eq!(wb.sheets[0].name, "Sheet1");
        assert_eq!(wb.row_count(), 2);
    }

    #[test]
    fn test_workbook_rejects_scalar_root() {
        assert!(Workbook::from_value(json!("hello")).is_err());
    }
}
