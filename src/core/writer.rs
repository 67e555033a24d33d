use crate::domain::model::{OutputRecord, OUTPUT_HEADER};
use crate::utils::error::{ConvertError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Serializes `records` as a Bitwarden CSV import: fixed header, comma
/// delimiter, `\n` line endings, quoting only where needed.
pub fn to_csv_bytes(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_HEADER)?;

    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ConvertError::IoError(e.into_error()))
}

/// Sibling file the data is written to before it is renamed into place.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Writes `records` to `path` through `<path>.part` and a rename, so `path`
/// is either the complete file or untouched.
///
/// Convenience entry point for library callers; the pipeline writes through
/// `Storage` instead.
pub fn write(path: &Path, records: &[OutputRecord]) -> Result<()> {
    let data = to_csv_bytes(records)?;
    let write_error = |source| ConvertError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let partial = partial_path(path);
    if let Err(e) = std::fs::write(&partial, data) {
        let _ = std::fs::remove_file(&partial);
        return Err(write_error(e));
    }
    if let Err(e) = std::fs::rename(&partial, path) {
        let _ = std::fs::remove_file(&partial);
        return Err(write_error(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> OutputRecord {
        let mut record = OutputRecord::login(name.to_string());
        record.favorite = "1".to_string();
        record.login_uri = "http://a.com,http://b.com".to_string();
        record.login_username = "u".to_string();
        record.login_password = "p".to_string();
        record
    }

    #[test]
    fn test_header_and_row_layout() {
        let bytes = to_csv_bytes(&[entry("Site A")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), OUTPUT_HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            ",1,login,Site A,,,0,\"http://a.com,http://b.com\",u,p,"
        );
        assert!(lines.next().is_none());
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_multiline_notes_round_trip() {
        let mut record = entry("Quote \"me\"");
        record.notes = "line one\nline two, with comma".to_string();
        let bytes = to_csv_bytes(std::slice::from_ref(&record)).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let parsed: Vec<OutputRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            write(&path, &[entry("a")]),
            Err(ConvertError::WriteError { .. })
        ));
    }

    #[test]
    fn test_empty_slice_still_has_header() {
        let bytes = to_csv_bytes(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), format!("{}\n", OUTPUT_HEADER.join(",")));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write(&path, &[entry("a"), entry("b")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_write_onto_directory_leaves_no_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            write(&path, &[entry("a")]),
            Err(ConvertError::WriteError { .. })
        ));
        assert!(path.is_dir());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("out/bw.csv")),
            PathBuf::from("out/bw.csv.part")
        );
    }
}
