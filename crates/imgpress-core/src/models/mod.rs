//! Request and response models.

pub mod compression;

pub use compression::{CompressResponse, UploadedImage};
