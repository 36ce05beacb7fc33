//! Service wiring and background tasks

use anyhow::Result;
use imgpress_core::constants::{RETENTION_SWEEP_HOUR_UTC, RETENTION_SWEEP_MINUTE_UTC};
use imgpress_core::Config;
use imgpress_services::{DailySchedule, NativeEncoder, RetentionSweeper, Storage};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::state::AppState;

/// Build the shared application state with the in-process encoder.
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let state = AppState::new(config.clone(), storage, Arc::new(NativeEncoder));

    tracing::info!(
        encode_timeout_secs = config.encode_timeout_secs,
        retain_rejected_originals = config.retain_rejected_originals,
        "Compression service initialized"
    );

    Ok(Arc::new(state))
}

/// Start the background tasks. The returned handles are aborted on shutdown.
pub fn start_background_tasks(
    config: &Config,
    state: &AppState,
) -> Result<Vec<JoinHandle<()>>> {
    let mut handles = Vec::new();

    if config.retention_sweep_enabled {
        let schedule = DailySchedule::new(RETENTION_SWEEP_HOUR_UTC, RETENTION_SWEEP_MINUTE_UTC)?;
        let sweeper = Arc::new(RetentionSweeper::new(state.storage.clone()).with_schedule(schedule));
        handles.push(sweeper.start());
        tracing::info!(
            hour_utc = RETENTION_SWEEP_HOUR_UTC,
            minute_utc = RETENTION_SWEEP_MINUTE_UTC,
            "Retention sweep scheduled"
        );
    } else {
        tracing::warn!("Retention sweep disabled; stored files will not expire");
    }

    Ok(handles)
}
