use imgpress_core::AppError;
use imgpress_storage::StorageError;
use thiserror::Error;

/// Compression errors
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CompressionError> for AppError {
    fn from(err: CompressionError) -> Self {
        match err {
            CompressionError::UnsupportedFormat(mime) => AppError::UnsupportedFormat(mime),
            CompressionError::EncodingFailed(msg) => AppError::EncodingFailed(msg),
            CompressionError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}
