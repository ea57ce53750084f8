use crate::domain::ports::Storage;
use crate::utils::error::{ExportError, Result};
use std::fs;
use std::path::Path;

/// Writes straight to the local filesystem. Writes are not atomic: a failure
/// halfway through may leave a truncated file behind.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    async fn create_dir_all(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| ExportError::filesystem(dir, e))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data).map_err(|e| ExportError::filesystem(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let storage = LocalStorage::new();
        storage.create_dir_all(&nested).await.unwrap();
        // Existing directories are fine.
        storage.create_dir_all(&nested).await.unwrap();

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");

        let storage = LocalStorage::new();
        storage.write_file(&path, b"first version").await.unwrap();
        storage.write_file(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_is_filesystem_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("export.json");

        let err = LocalStorage::new().write_file(&path, b"{}").await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert!(err.to_string().contains("export.json"));
    }
}
