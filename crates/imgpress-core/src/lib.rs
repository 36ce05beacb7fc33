//! imgpress Core Library
//!
//! This crate provides the configuration, error taxonomy, constants and request/response
//! models shared by every imgpress component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
