//! imgpress Storage Library
//!
//! This crate provides the storage abstraction used by the compressor and the retention
//! sweeper, and its local filesystem implementation.
//!
//! # Storage key format
//!
//! Keys are plain file names inside a single flat output directory (for example
//! `compressed-1718000000000.jpeg`). Keys must not contain `..`, path separators, or be
//! empty; the same key is used as the last segment of the public `/uploads/...` URL.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{EntryMetadata, KeySnapshot, Storage, StorageError, StorageResult};
