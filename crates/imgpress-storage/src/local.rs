use crate::traits::{EntryMetadata, KeySnapshot, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the directory if needed.
    ///
    /// # Arguments
    /// * `base_path` - Output directory (e.g., "uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys are single path segments; anything that could address a file outside the
    /// storage directory is rejected.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key == "." {
            return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
        }

        if key.contains("..") || key.contains('/') || key.contains('\\') || key.contains('\0') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(key))
    }

    /// Temp file used while writing `key`; hidden and unique per write.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.part", key, Uuid::new_v4().simple()))
    }

    async fn write_temp(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn remove_temp(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove temporary file"
                );
            }
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_new(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let temp = self.temp_path(key);
        let size = data.len();
        let start = std::time::Instant::now();

        if let Err(e) = Self::write_temp(&temp, &data).await {
            Self::remove_temp(&temp).await;
            return Err(e);
        }

        // hard_link refuses to replace an existing target, which gives no-clobber
        // publication of a fully written file.
        let linked = fs::hard_link(&temp, &path).await;
        Self::remove_temp(&temp).await;

        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(e) => {
                return Err(StorageError::UploadFailed(format!(
                    "Failed to publish file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn list_keys(&self) -> StorageResult<KeySnapshot> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut snapshot = KeySnapshot::default();

        while let Some(entry) = entries.next_entry().await? {
            match entry.file_name().into_string() {
                Ok(name) => snapshot.keys.push(name),
                Err(name) => {
                    tracing::warn!(name = ?name, "Storage entry has a non UTF-8 name");
                    snapshot.unaddressable += 1;
                }
            }
        }

        Ok(snapshot)
    }

    async fn stat(&self, key: &str) -> StorageResult<EntryMetadata> {
        let path = self.key_to_path(key)?;
        let meta = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::IoError(e)
            }
        })?;

        Ok(EntryMetadata {
            modified: meta.modified()?,
            len: meta.len(),
            is_file: meta.is_file(),
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(true)
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_put_and_list() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .put_new("compressed-1.jpeg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();

        let snapshot = storage.list_keys().await.unwrap();
        assert_eq!(snapshot.keys, vec!["compressed-1.jpeg".to_string()]);
        assert_eq!(snapshot.unaddressable, 0);

        let written = std::fs::read(dir.path().join("compressed-1.jpeg")).unwrap();
        assert_eq!(written, b"jpeg bytes");

        let meta = storage.stat("compressed-1.jpeg").await.unwrap();
        assert_eq!(meta.len, 10);
        assert!(meta.is_file);
    }

    #[tokio::test]
    async fn test_put_new_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .put_new("photo.png", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let result = storage
            .put_new("photo.png", Bytes::from_static(b"second"))
            .await;

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(std::fs::read(dir.path().join("photo.png")).unwrap(), b"first");
        // The losing write must not leave its temp file behind.
        assert_eq!(storage.list_keys().await.unwrap().keys.len(), 1);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .put_new("../escape.png", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("nested/file.png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.stat("").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .put_new("old.webp", Bytes::from_static(b"webp"))
            .await
            .unwrap();

        assert!(storage.delete("old.webp").await.unwrap());
        assert!(!storage.delete("old.webp").await.unwrap());
        assert!(!dir.path().join("old.webp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_names_are_counted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("ok.png"), b"png").unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.jpeg")), b"jpeg").unwrap();

        let snapshot = storage.list_keys().await.unwrap();
        assert_eq!(snapshot.keys, vec!["ok.png".to_string()]);
        assert_eq!(snapshot.unaddressable, 1);
    }

    #[tokio::test]
    async fn test_stat_missing_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.stat("missing.jpeg").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_new_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("uploads");
        let storage = LocalStorage::new(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.root(), nested.as_path());
    }
}
