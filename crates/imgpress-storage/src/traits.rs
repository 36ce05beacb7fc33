//! Storage abstraction trait
//!
//! This module defines the Storage trait implemented by storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What the retention sweep needs to know about a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub modified: SystemTime,
    pub len: u64,
    pub is_file: bool,
}

/// Keys present in the storage directory at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub keys: Vec<String>,
    /// Entries whose names cannot be expressed as keys (not valid UTF-8)
    pub unaddressable: usize,
}

/// Storage abstraction trait
///
/// The storage directory is shared between request handlers (which only add files) and
/// the retention sweeper (which only removes them). Backends provide atomicity of the
/// individual operations; there is no locking across them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` atomically.
    ///
    /// Readers never observe a partially written file. Fails with
    /// [`StorageError::AlreadyExists`] rather than replacing an existing entry.
    async fn put_new(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Snapshot of the keys currently present.
    async fn list_keys(&self) -> StorageResult<KeySnapshot>;

    /// Metadata for a single entry
    async fn stat(&self, key: &str) -> StorageResult<EntryMetadata>;

    /// Delete an entry.
    ///
    /// Idempotent: returns `Ok(false)` if the entry was already gone.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Root directory, used for static serving
    fn root(&self) -> &Path;
}
