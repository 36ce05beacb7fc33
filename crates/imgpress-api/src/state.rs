//! Application state shared by all handlers.

use imgpress_core::Config;
use imgpress_services::{Compressor, ImageEncoder, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub compressor: Compressor,
}

impl AppState {
    /// Wire the compressor to `storage` and `encoder` using the configured encode timeout.
    pub fn new(config: Config, storage: Arc<dyn Storage>, encoder: Arc<dyn ImageEncoder>) -> Self {
        let compressor = Compressor::new(storage.clone(), encoder)
            .with_encode_timeout(config.encode_timeout());

        Self {
            config,
            storage,
            compressor,
        }
    }
}
