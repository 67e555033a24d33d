use crate::utils::error::{ConvertError, Result};
use std::fs::File;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if text.contains('\0') {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one value is required".to_string(),
        });
    }
    Ok(())
}

/// The source must be an existing, readable regular file.
pub fn validate_input_file(path: &Path) -> Result<()> {
    let path_error = |reason: &str| ConvertError::PathError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = std::fs::metadata(path).map_err(|_| path_error("The file was not found"))?;
    if !metadata.is_file() {
        return Err(path_error("The path is not a regular file"));
    }
    File::open(path).map_err(|e| path_error(&format!("The file cannot be read: {}", e)))?;

    Ok(())
}

/// The destination must not be a directory; its parent directory is created if missing.
pub fn prepare_output_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(ConvertError::PathError {
            path: path.to_path_buf(),
            reason: "The output path is a directory".to_string(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            tracing::info!("Creating output directory {}", parent.display());
        }
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::PathError {
            path: parent.to_path_buf(),
            reason: format!("The output directory cannot be created: {}", e),
        })?;
    }

    Ok(())
}
