//! Compression decision.
//!
//! A re-encode is only kept when it is strictly smaller than the upload. Otherwise the
//! outcome points back at the original and nothing is written.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use imgpress_core::constants::COMPRESSED_FILE_PREFIX;
use imgpress_core::models::UploadedImage;
use imgpress_storage::{Storage, StorageError};

use crate::encoder::ImageEncoder;
use crate::error::CompressionError;
use crate::format::OutputFormat;

/// How many consecutive millisecond timestamps are tried before giving up on a name.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Name of an accepted output: `compressed-<unix-millis>.<format>`.
pub fn output_file_name(format: OutputFormat, timestamp_millis: i64) -> String {
    format!(
        "{}{}.{}",
        COMPRESSED_FILE_PREFIX,
        timestamp_millis,
        format.extension()
    )
}

/// Name an original is retained under when its own name is already taken:
/// `<stem>-<unix-millis>.<ext>`.
pub fn retained_file_name(original: &str, timestamp_millis: i64) -> String {
    match original.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, timestamp_millis, ext),
        _ => format!("{}-{}", original, timestamp_millis),
    }
}

/// Whether the re-encoded bytes replace the original
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Re-encode was smaller and has been written under `file_name`
    Accepted { file_name: String },
    /// Re-encode was not smaller; the original upload stands
    Rejected,
}

/// Result of one compression attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOutcome {
    pub format: OutputFormat,
    pub original_size: u64,
    pub compressed_size: u64,
    pub original_file_name: String,
    pub decision: Decision,
}

impl CompressionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self.decision, Decision::Accepted { .. })
    }

    /// Name of the file the client should fetch: the generated output when accepted,
    /// the original upload's name when rejected.
    pub fn file_name(&self) -> &str {
        match self.decision {
            Decision::Accepted { ref file_name } => file_name,
            Decision::Rejected => &self.original_file_name,
        }
    }
}

/// Re-encodes uploads with the profile of their format and keeps the result only if it
/// is smaller.
#[derive(Clone)]
pub struct Compressor {
    storage: Arc<dyn Storage>,
    encoder: Arc<dyn ImageEncoder>,
    encode_timeout: Option<Duration>,
}

impl Compressor {
    pub fn new(storage: Arc<dyn Storage>, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self {
            storage,
            encoder,
            encode_timeout: None,
        }
    }

    /// Bound the time a single encode may take. `None` waits indefinitely.
    pub fn with_encode_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.encode_timeout = timeout;
        self
    }

    /// Compress an upload.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the declared MIME subtype is not jpeg, png or webp
    /// - `EncodingFailed` if the encoder fails, panics or times out
    /// - `Storage` if an accepted output cannot be written
    #[tracing::instrument(
        skip(self, upload),
        fields(
            content_type = %upload.content_type,
            original_size = upload.size(),
            operation = "compress"
        )
    )]
    pub async fn compress(
        &self,
        upload: &UploadedImage,
    ) -> Result<CompressionOutcome, CompressionError> {
        let format = OutputFormat::from_mime_type(&upload.content_type)?;

        let encoded = self.encode(upload.data.clone(), format).await?;

        let original_size = upload.size();
        let compressed_size = encoded.len() as u64;

        tracing::debug!(
            format = %format,
            original_size,
            compressed_size,
            "Image re-encoded"
        );

        if compressed_size >= original_size {
            tracing::warn!(
                format = %format,
                original_size,
                compressed_size,
                original_file_name = %upload.original_file_name,
                "Re-encoded image is not smaller than the original, serving the original"
            );

            return Ok(CompressionOutcome {
                format,
                original_size,
                compressed_size,
                original_file_name: upload.original_file_name.clone(),
                decision: Decision::Rejected,
            });
        }

        let file_name = self.store(format, Bytes::from(encoded)).await?;

        tracing::info!(
            format = %format,
            original_size,
            compressed_size,
            file_name = %file_name,
            "Compressed image stored"
        );

        Ok(CompressionOutcome {
            format,
            original_size,
            compressed_size,
            original_file_name: upload.original_file_name.clone(),
            decision: Decision::Accepted { file_name },
        })
    }

    async fn encode(&self, data: Bytes, format: OutputFormat) -> Result<Vec<u8>, CompressionError> {
        let encoder = Arc::clone(&self.encoder);
        let profile = format.profile();
        let task = tokio::task::spawn_blocking(move || encoder.encode(&data, format, profile));

        let joined = match self.encode_timeout {
            Some(timeout) => tokio::time::timeout(timeout, task).await.map_err(|_| {
                CompressionError::EncodingFailed(format!("Encoding timed out after {:?}", timeout))
            })?,
            None => task.await,
        };

        joined
            .map_err(|e| CompressionError::EncodingFailed(format!("Encoder task failed: {}", e)))?
            .map_err(|e| CompressionError::EncodingFailed(format!("{:#}", e)))
    }

    /// Store the upload behind a rejected outcome and return the name it is served
    /// under.
    ///
    /// The upload keeps its own name when that is free. Otherwise it goes under
    /// [`retained_file_name`], so a URL never resolves to another upload's bytes.
    ///
    /// # Errors
    /// - `Storage` if the file cannot be written or no free name is found
    #[tracing::instrument(
        skip(self, upload),
        fields(file_name = %upload.original_file_name, operation = "retain_original")
    )]
    pub async fn retain_original(
        &self,
        upload: &UploadedImage,
    ) -> Result<String, CompressionError> {
        let name = upload.original_file_name.as_str();

        match self.storage.put_new(name, upload.data.clone()).await {
            Ok(()) => return Ok(name.to_string()),
            Err(StorageError::AlreadyExists(_)) => {
                tracing::debug!("Original name taken, storing under a timestamped name");
            }
            Err(e) => return Err(e.into()),
        }

        let stored = self
            .put_unique(upload.data.clone(), |millis| retained_file_name(name, millis))
            .await?;

        tracing::info!(stored_as = %stored, "Original retained under a new name");
        Ok(stored)
    }

    /// Write an accepted output under a fresh timestamped name.
    async fn store(&self, format: OutputFormat, data: Bytes) -> Result<String, CompressionError> {
        self.put_unique(data, |millis| output_file_name(format, millis)).await
    }

    /// Write `data` under the first free name produced by `name_for`.
    ///
    /// Two writes within the same millisecond would share a name; the later one moves to
    /// the next free millisecond instead of replacing the earlier file.
    async fn put_unique(
        &self,
        data: Bytes,
        name_for: impl Fn(i64) -> String,
    ) -> Result<String, CompressionError> {
        let base_millis = Utc::now().timestamp_millis();
        let mut last_err = None;

        for offset in 0..MAX_NAME_ATTEMPTS {
            let file_name = name_for(base_millis + offset);
            match self.storage.put_new(&file_name, data.clone()).await {
                Ok(()) => return Ok(file_name),
                Err(StorageError::AlreadyExists(name)) => {
                    tracing::debug!(file_name = %name, "Output name taken, trying next timestamp");
                    last_err = Some(StorageError::AlreadyExists(name));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err
            .unwrap_or_else(|| StorageError::UploadFailed("No output name available".to_string()))
            .into())
    }
}
