use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Path error for {}: {reason}", path.display())]
    PathError { path: PathBuf, reason: String },

    #[error("Could not decode {} with any of: {tried}", path.display())]
    DecodeError { path: PathBuf, tried: String },

    #[error("The file at {} is empty", path.display())]
    EmptyInputError { path: PathBuf },

    #[error("Row {row} could not be processed: {message}")]
    RowProcessingError { row: usize, message: String },

    #[error("No rows to write ({rows} read, {errors} failed)")]
    EmptyOutputError { rows: usize, errors: usize },

    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Path,
    Input,
    Processing,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::PathError { .. } => ErrorCategory::Path,
            ConvertError::DecodeError { .. }
            | ConvertError::EmptyInputError { .. }
            | ConvertError::CsvError(_) => ErrorCategory::Input,
            ConvertError::RowProcessingError { .. } | ConvertError::EmptyOutputError { .. } => {
                ErrorCategory::Processing
            }
            ConvertError::WriteError { .. } | ConvertError::IoError(_) => ErrorCategory::Output,
            ConvertError::ConfigError { .. } | ConvertError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單列錯誤只計數，不中斷轉換
            ConvertError::RowProcessingError { .. } => ErrorSeverity::Low,
            ConvertError::ConfigError { .. } | ConvertError::InvalidConfigValueError { .. } => {
                ErrorSeverity::Medium
            }
            ConvertError::WriteError { .. } | ConvertError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConvertError::PathError { .. } => {
                "Check that the source file exists and the destination folder is writable"
            }
            ConvertError::DecodeError { .. } => {
                "Re-export the vault from Synology C2 Password, or save the CSV as UTF-8"
            }
            ConvertError::EmptyInputError { .. } => {
                "The export has no header row; export the vault again from Synology C2 Password"
            }
            ConvertError::RowProcessingError { .. } => "Fix or re-enter the skipped entry manually",
            ConvertError::EmptyOutputError { .. } => {
                "The export contains no usable entries; check that the right file was selected"
            }
            ConvertError::WriteError { .. } | ConvertError::IoError(_) => {
                "Check free disk space and write permissions for the destination"
            }
            ConvertError::CsvError(_) => "Open the export in a text editor and check its CSV structure",
            ConvertError::ConfigError { .. } | ConvertError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::PathError { path, reason } => {
                format!("Error: {} ({})", reason, path.display())
            }
            ConvertError::DecodeError { path, .. } => {
                format!("Error: The file at {} could not be read as text.", path.display())
            }
            ConvertError::EmptyInputError { path } => {
                format!("Error: The file at {} is empty.", path.display())
            }
            ConvertError::EmptyOutputError { rows, errors } => format!(
                "Error: No entries could be converted ({} rows read, {} skipped); nothing was written.",
                rows, errors
            ),
            ConvertError::WriteError { path, source } => format!(
                "An error occurred while saving the file {}: {}",
                path.display(),
                source
            ),
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_errors_do_not_fail_the_run() {
        let row = ConvertError::RowProcessingError {
            row: 3,
            message: "bad".to_string(),
        };
        assert_eq!(row.severity(), ErrorSeverity::Low);
        assert_eq!(row.exit_code(), 0);

        let empty = ConvertError::EmptyOutputError { rows: 0, errors: 0 };
        assert_eq!(empty.severity(), ErrorSeverity::High);
        assert_eq!(empty.exit_code(), 1);
        assert_eq!(empty.category(), ErrorCategory::Processing);
    }

    #[test]
    fn test_write_error_is_critical() {
        let err = ConvertError::WriteError {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().contains("out.csv"));
    }

    #[test]
    fn test_empty_input_message_names_the_file() {
        let err = ConvertError::EmptyInputError {
            path: PathBuf::from("c2_file.csv"),
        };
        assert_eq!(
            err.user_friendly_message(),
            "Error: The file at c2_file.csv is empty."
        );
        assert_eq!(err.category(), ErrorCategory::Input);
    }
}
