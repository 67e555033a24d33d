use crate::core::dialect;
use crate::core::encoding::{self, EncodingCandidate};
use crate::domain::model::{Dialect, LoadedTable, SourceRecord};
use crate::utils::error::{ConvertError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Reads and parses the export at `path`.
///
/// Convenience entry point for library callers; the pipeline reads through
/// `Storage` and hands the bytes to [`load_bytes`].
pub fn load(path: &Path, encodings: &[EncodingCandidate], sample_size: usize) -> Result<LoadedTable> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::PathError {
            path: path.to_path_buf(),
            reason: "The file was not found".to_string(),
        },
        _ => ConvertError::IoError(e),
    })?;
    load_bytes(path, &bytes, encodings, sample_size)
}

/// Parses already-read file contents. `path` is only used in error reports.
pub fn load_bytes(
    path: &Path,
    bytes: &[u8],
    encodings: &[EncodingCandidate],
    sample_size: usize,
) -> Result<LoadedTable> {
    let (candidate, text) =
        encoding::decode_first(bytes, encodings).ok_or_else(|| ConvertError::DecodeError {
            path: path.to_path_buf(),
            tried: encoding::candidate_names(encodings),
        })?;
    tracing::debug!("Decoded {} as {}", path.display(), candidate);

    if text.trim().is_empty() {
        return Err(ConvertError::EmptyInputError {
            path: path.to_path_buf(),
        });
    }

    let dialect = dialect::sniff(dialect::sample(&text, sample_size)).unwrap_or_else(|| {
        tracing::debug!("Could not infer CSV dialect, using comma-separated defaults");
        Dialect::default()
    });
    tracing::debug!(
        "Dialect: delimiter {:?}, quote {:?}",
        dialect.delimiter as char,
        dialect.quote.map(char::from)
    );

    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quoting(dialect.quote.is_some())
        .quote(dialect.quote.unwrap_or(b'"'))
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err(ConvertError::EmptyInputError {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank_line(&record) {
            continue;
        }
        let row = records.len() + 1;
        records.push(SourceRecord::new(row, record.iter().map(str::to_string).collect()));
    }

    tracing::info!(
        "Loaded {} rows with {} columns ({})",
        records.len(),
        columns.len(),
        candidate
    );

    Ok(LoadedTable {
        columns,
        records,
        encoding: candidate.name(),
        dialect,
    })
}

fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}
