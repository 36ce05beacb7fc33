//! imgpress Services Layer
//!
//! This crate is the **service layer**: it hosts the background retention sweep and
//! re-exports a unified API from processing and storage so that the API crate depends on
//! a single service facade. Keep coordination here; keep thin HTTP handling in
//! imgpress-api.

#[cfg(feature = "cleanup")]
pub mod cleanup;

#[cfg(feature = "cleanup")]
pub use cleanup::{DailySchedule, RetentionSweeper, SweepFailure, SweepReport, SweepStage};
#[cfg(feature = "native-encoder")]
pub use imgpress_processing::NativeEncoder;
pub use imgpress_processing::{
    output_file_name, retained_file_name, CompressionError, CompressionOutcome, Compressor,
    Decision, EncodingProfile, ImageEncoder, OutputFormat, ResultReporter,
};
pub use imgpress_storage::{
    EntryMetadata, KeySnapshot, LocalStorage, Storage, StorageError, StorageResult,
};
