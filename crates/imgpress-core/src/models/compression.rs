use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An image received with a compression request.
///
/// Request-scoped: it is built from the multipart body, handed to the compressor and
/// dropped once the response is sent.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    /// MIME type declared by the client for the uploaded part
    pub content_type: String,
    pub original_file_name: String,
}

impl UploadedImage {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        original_file_name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            original_file_name: original_file_name.into(),
        }
    }

    /// Size of the upload in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Response body of a successful compression request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    /// Public URL of the file to serve (compressed output, or the original when
    /// re-encoding did not shrink it)
    #[schema(example = "http://localhost:5001/uploads/compressed-1718000000000.jpeg")]
    pub url: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Percentage saved, always with two decimals; "0.00" when the original is served
    #[schema(example = "60.00")]
    pub compression_ratio: String,
    pub file_name: String,
    /// Format tag: `jpeg`, `png` or `webp`
    pub format: String,
}
