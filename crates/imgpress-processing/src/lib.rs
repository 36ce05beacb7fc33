//! imgpress Processing Library
//!
//! Format dispatch, the encoder seam, the compression accept/reject decision and the
//! shaping of compression results.

pub mod compressor;
pub mod encoder;
pub mod error;
pub mod format;
pub mod report;

// Re-export commonly used types
pub use compressor::{
    output_file_name, retained_file_name, CompressionOutcome, Compressor, Decision,
};
#[cfg(feature = "native-encoder")]
pub use encoder::NativeEncoder;
pub use encoder::ImageEncoder;
pub use error::CompressionError;
pub use format::{EncodingProfile, OutputFormat};
pub use report::ResultReporter;
