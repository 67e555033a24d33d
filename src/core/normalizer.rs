//! Maps Synology C2 rows onto Bitwarden login entries.

use crate::domain::model::{
    column_index, source_columns, LoadedTable, NormalizedBatch, OutputRecord, SourceRecord,
};
use crate::utils::error::{ConvertError, Result};
use std::collections::HashMap;

/// Cell contents spreadsheet exports use to mean "no value".
const SENTINELS: [&str; 4] = ["", "nan", "none", "null"];

/// False for a missing value or a value that trims to one of the sentinels
/// (case-insensitive).
pub fn is_value_present(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => {
            let cleaned = raw.trim().to_lowercase();
            !SENTINELS.contains(&cleaned.as_str())
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| is_value_present(Some(*v)))
}

/// Newline-separated URLs become one comma-separated `login_uri` value.
pub fn flatten_urls(value: Option<&str>) -> String {
    let Some(raw) = present(value) else {
        return String::new();
    };
    raw.split('\n')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

struct RowView<'a> {
    index: &'a HashMap<&'a str, usize>,
    record: &'a SourceRecord,
}

impl<'a> RowView<'a> {
    fn get(&self, column: &str) -> Option<&'a str> {
        let position = *self.index.get(column)?;
        self.record.fields.get(position).map(String::as_str)
    }

    fn text(&self, column: &str) -> String {
        present(self.get(column)).unwrap_or_default().to_string()
    }
}

/// Converts one row. Fails when the row is structurally broken.
pub fn normalize_row(
    index: &HashMap<&str, usize>,
    column_count: usize,
    record: &SourceRecord,
) -> Result<OutputRecord> {
    if record.fields.len() > column_count {
        return Err(ConvertError::RowProcessingError {
            row: record.row,
            message: format!(
                "row has {} fields but the header has {} columns",
                record.fields.len(),
                column_count
            ),
        });
    }
    if record.fields.iter().any(|field| field.contains('\0')) {
        return Err(ConvertError::RowProcessingError {
            row: record.row,
            message: "row contains NUL characters".to_string(),
        });
    }

    let view = RowView { index, record };

    let name = match present(view.get(source_columns::DISPLAY_NAME)) {
        Some(name) => name.to_string(),
        None => format!("Entry_{}", record.row),
    };

    let mut output = OutputRecord::login(name);
    output.favorite = view.text(source_columns::FAVORITE);
    output.notes = view.text(source_columns::NOTES);
    output.login_uri = flatten_urls(view.get(source_columns::LOGIN_URLS));
    output.login_username = view.text(source_columns::LOGIN_USERNAME);
    output.login_password = view.text(source_columns::LOGIN_PASSWORD);
    output.login_totp = view.text(source_columns::LOGIN_TOTP);
    Ok(output)
}

/// Converts every row, skipping and counting the ones that fail.
/// Returns the converted entries in input order and the number of skipped rows.
pub fn normalize(columns: &[String], records: &[SourceRecord]) -> (Vec<OutputRecord>, usize) {
    let index = column_index(columns);
    let mut outputs = Vec::with_capacity(records.len());
    let mut error_count = 0;

    for record in records {
        match normalize_row(&index, columns.len(), record) {
            Ok(output) => outputs.push(output),
            Err(e) => {
                error_count += 1;
                tracing::warn!("Skipping row {}: {}", record.row, e);
            }
        }
    }

    (outputs, error_count)
}

/// Normalizes a loaded table; an empty result is an error rather than an empty file.
pub fn normalize_table(table: LoadedTable) -> Result<NormalizedBatch> {
    let (records, error_count) = normalize(&table.columns, &table.records);
    let total_rows = table.records.len();

    if records.is_empty() {
        return Err(ConvertError::EmptyOutputError {
            rows: total_rows,
            errors: error_count,
        });
    }

    Ok(NormalizedBatch {
        records,
        error_count,
        total_rows,
        encoding: table.encoding,
        dialect: table.dialect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Dialect;

    fn columns() -> Vec<String> {
        [
            "Login_URLs",
            "Favorite",
            "Display_Name",
            "Notes",
            "Login_Username",
            "Login_Password",
            "Login_TOTP",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    fn record(row: usize, fields: &[&str]) -> SourceRecord {
        SourceRecord::new(row, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_presence_sentinels() {
        for absent in [None, Some(""), Some("nan"), Some("NaN"), Some("NONE"), Some(" null ")] {
            assert!(!is_value_present(absent), "{:?} should be absent", absent);
        }
        for present in ["0", "false", "a"] {
            assert!(is_value_present(Some(present)), "{:?} should be present", present);
        }
    }

    #[test]
    fn test_flatten_urls() {
        assert_eq!(
            flatten_urls(Some(" http://a.com \r\n\nhttp://b.com\n")),
            "http://a.com,http://b.com"
        );
        assert_eq!(flatten_urls(Some("http://a.com")), "http://a.com");
        assert_eq!(flatten_urls(Some("nan")), "");
        assert_eq!(flatten_urls(None), "");
    }

    #[test]
    fn test_scenario_row() {
        let records = vec![record(
            1,
            &["http://a.com\nhttp://b.com", "1", "Site A", "", "u", "p", ""],
        )];
        let (outputs, errors) = normalize(&columns(), &records);

        assert_eq!(errors, 0);
        assert_eq!(
            outputs,
            vec![OutputRecord {
                folder: String::new(),
                favorite: "1".to_string(),
                item_type: "login".to_string(),
                name: "Site A".to_string(),
                notes: String::new(),
                fields: String::new(),
                reprompt: 0,
                login_uri: "http://a.com,http://b.com".to_string(),
                login_username: "u".to_string(),
                login_password: "p".to_string(),
                login_totp: String::new(),
            }]
        );
    }

    #[test]
    fn test_name_defaults_to_row_number() {
        let records = vec![
            record(1, &["", "", "Named", "", "", "", ""]),
            record(2, &["", "", "   ", "", "", "", ""]),
            record(3, &["", "", "null", "", "", "", ""]),
        ];
        let (outputs, _) = normalize(&columns(), &records);
        let names: Vec<&str> = outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Named", "Entry_2", "Entry_3"]);
    }

    #[test]
    fn test_missing_and_unknown_columns() {
        let columns: Vec<String> = vec!["Display_Name".into(), "Folder_Id".into()];
        let (outputs, errors) = normalize(&columns, &[record(1, &["Site", "42"])]);
        assert_eq!(errors, 0);
        assert_eq!(outputs[0].name, "Site");
        assert_eq!(outputs[0].login_uri, "");
        assert_eq!(outputs[0].login_password, "");
        assert_eq!(outputs[0].item_type, "login");
    }

    #[test]
    fn test_short_row_fills_absent_fields() {
        let (outputs, errors) = normalize(&columns(), &[record(1, &["http://a.com", "1"])]);
        assert_eq!(errors, 0);
        assert_eq!(outputs[0].name, "Entry_1");
        assert_eq!(outputs[0].notes, "");
    }

    #[test]
    fn test_malformed_rows_are_counted_and_skipped() {
        let records = vec![
            record(1, &["", "", "Too", "many", "", "", "", "extra"]),
            record(2, &["", "", "Valid", "", "u", "p", ""]),
            record(3, &["", "", "Nul\0", "", "", "", ""]),
        ];
        let (outputs, errors) = normalize(&columns(), &records);
        assert_eq!(errors, 2);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "Valid");
    }

    #[test]
    fn test_empty_result_is_an_error() {
        let table = LoadedTable {
            columns: columns(),
            records: vec![],
            encoding: "utf-8",
            dialect: Dialect::default(),
        };
        match normalize_table(table) {
            Err(ConvertError::EmptyOutputError { rows, errors }) => {
                assert_eq!((rows, errors), (0, 0));
            }
            other => panic!("expected EmptyOutputError, got {:?}", other),
        }
    }

    #[test]
    fn test_all_rows_failing_is_an_error() {
        let table = LoadedTable {
            columns: vec!["Display_Name".into()],
            records: vec![record(1, &["a", "b"])],
            encoding: "utf-8",
            dialect: Dialect::default(),
        };
        assert!(matches!(
            normalize_table(table),
            Err(ConvertError::EmptyOutputError { rows: 1, errors: 1 })
        ));
    }
}
