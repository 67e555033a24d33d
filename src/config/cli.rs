use crate::core::writer::partial_path;
use crate::core::Storage;
use crate::utils::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Local file system storage. Relative paths resolve against `base_path`.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tokio::fs::read(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConvertError::PathError {
                path: full_path.clone(),
                reason: "The file was not found".to_string(),
            },
            _ => ConvertError::IoError(e),
        })
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let write_error = |source| ConvertError::WriteError {
            path: full_path.clone(),
            source,
        };

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let partial = partial_path(&full_path);
        if let Err(e) = tokio::fs::write(&partial, data).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(write_error(e));
        }
        if let Err(e) = tokio::fs::rename(&partial, &full_path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(write_error(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write_file(Path::new("out/bw.csv"), b"folder\n")
            .await
            .unwrap();
        let data = storage.read_file(Path::new("out/bw.csv")).await.unwrap();

        assert_eq!(data, b"folder\n");
        assert!(!dir.path().join("out/bw.csv.part").exists());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(matches!(
            storage.read_file(Path::new("nope.csv")).await,
            Err(ConvertError::PathError { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_onto_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        let storage = LocalStorage::new(dir.path());

        let result = storage.write_file(Path::new("taken"), b"data").await;
        assert!(matches!(result, Err(ConvertError::WriteError { .. })));
        assert!(!dir.path().join("taken.part").exists());
    }
}
