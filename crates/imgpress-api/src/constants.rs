//! API constants

/// Multipart field carrying the image
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Compression endpoint
pub const COMPRESS_PATH: &str = "/compress";

/// Prefix under which stored files are served
pub const UPLOADS_PATH: &str = "/uploads";

/// Allowance on top of the file size limit for multipart boundaries and part headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Default server-wide concurrency limit
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;
