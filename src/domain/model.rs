use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Column names read from a Synology C2 Password export.
pub mod source_columns {
    pub const LOGIN_URLS: &str = "Login_URLs";
    pub const FAVORITE: &str = "Favorite";
    pub const DISPLAY_NAME: &str = "Display_Name";
    pub const NOTES: &str = "Notes";
    pub const LOGIN_USERNAME: &str = "Login_Username";
    pub const LOGIN_PASSWORD: &str = "Login_Password";
    pub const LOGIN_TOTP: &str = "Login_TOTP";
}

/// Header of a Bitwarden individual-vault CSV import, in column order.
pub const OUTPUT_HEADER: [&str; 11] = [
    "folder",
    "favorite",
    "type",
    "name",
    "notes",
    "fields",
    "reprompt",
    "login_uri",
    "login_username",
    "login_password",
    "login_totp",
];

/// One data row of the source file.
///
/// `fields` are positional and line up with `LoadedTable::columns`; a short row
/// simply has fewer fields, a long row has more fields than there are columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub fields: Vec<String>,
}

impl SourceRecord {
    pub fn new(row: usize, fields: Vec<String>) -> Self {
        Self { row, fields }
    }
}

/// Field delimiter and quote character used by a CSV file.
/// `quote` is `None` when fields are never quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: Option<u8>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: Some(b'"'),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub columns: Vec<String>,
    pub records: Vec<SourceRecord>,
    pub encoding: &'static str,
    pub dialect: Dialect,
}

/// Column name to position; the first occurrence wins for duplicated headers.
pub fn column_index(columns: &[String]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(columns.len());
    for (position, name) in columns.iter().enumerate() {
        index.entry(name.as_str()).or_insert(position);
    }
    index
}

/// A Bitwarden login entry. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub folder: String,
    pub favorite: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    pub notes: String,
    pub fields: String,
    pub reprompt: u8,
    pub login_uri: String,
    pub login_username: String,
    pub login_password: String,
    pub login_totp: String,
}

impl OutputRecord {
    pub const LOGIN_TYPE: &'static str = "login";

    /// A login entry with the constant columns filled in.
    pub fn login(name: String) -> Self {
        Self {
            folder: String::new(),
            favorite: String::new(),
            item_type: Self::LOGIN_TYPE.to_string(),
            name,
            notes: String::new(),
            fields: String::new(),
            reprompt: 0,
            login_uri: String::new(),
            login_username: String::new(),
            login_password: String::new(),
            login_totp: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<OutputRecord>,
    pub error_count: usize,
    pub total_rows: usize,
    pub encoding: &'static str,
    pub dialect: Dialect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub total_rows: usize,
    pub encoding: &'static str,
    pub delimiter: u8,
}
