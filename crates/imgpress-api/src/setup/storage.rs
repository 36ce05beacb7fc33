//! Storage setup and initialization

use anyhow::{Context, Result};
use imgpress_core::Config;
use imgpress_services::{LocalStorage, Storage};
use std::sync::Arc;

/// Open the storage directory, creating it if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(path = %config.storage_dir.display(), "Initializing local storage...");

    let storage = LocalStorage::new(&config.storage_dir)
        .await
        .context("Failed to initialize storage directory")?;

    tracing::info!("Local storage initialized successfully");
    Ok(Arc::new(storage))
}
