use chrono::{DateTime, Utc};
use imgpress_core::constants::{MILLIS_PER_DAY, RETENTION_MAX_AGE_DAYS};
use imgpress_storage::{Storage, StorageError};
use std::sync::Arc;

use super::schedule::DailySchedule;

/// Step of the sweep at which an entry failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStage {
    List,
    Stat,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub key: String,
    pub stage: SweepStage,
    pub error: String,
}

/// Summary of one retention pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries in the snapshot taken at the start of the pass
    pub scanned: usize,
    pub deleted: usize,
    pub retained: usize,
    /// Directories, entries that vanished before they could be examined, and entries
    /// whose names cannot be addressed as keys
    pub skipped: usize,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    fn fail(&mut self, key: &str, stage: SweepStage, error: impl ToString) {
        self.failures.push(SweepFailure {
            key: key.to_string(),
            stage,
            error: error.to_string(),
        });
    }
}

/// Deletes stored files older than the retention window once a day.
#[derive(Clone)]
pub struct RetentionSweeper {
    storage: Arc<dyn Storage>,
    max_age_days: f64,
    schedule: DailySchedule,
}

impl RetentionSweeper {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            max_age_days: RETENTION_MAX_AGE_DAYS,
            schedule: DailySchedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: DailySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_max_age_days(mut self, max_age_days: f64) -> Self {
        self.max_age_days = max_age_days;
        self
    }

    /// Start the background sweep task, firing once per day at the schedule's time.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let wait = self.schedule.until_next(Utc::now());
                tracing::debug!(
                    wait_secs = wait.as_secs(),
                    "Retention sweep sleeping until next run"
                );
                tokio::time::sleep(wait).await;

                tracing::info!("Starting scheduled retention sweep");

                let report = self.sweep_once(Utc::now()).await;
                if report.failures.is_empty() {
                    tracing::info!("Retention sweep completed successfully");
                } else {
                    tracing::warn!(
                        failures = report.failures.len(),
                        "Retention sweep completed with failures"
                    );
                }
            }
        })
    }

    /// Run a single pass against `now`.
    ///
    /// Keys are snapshotted first; files created afterwards are left for the next pass.
    /// An entry is deleted only when its age is strictly greater than the window.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "retention_sweep"))]
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let snapshot = match self.storage.list_keys().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %self.storage.root().display(),
                    "Failed to list storage directory"
                );
                report.fail("", SweepStage::List, e);
                return report;
            }
        };
        report.scanned = snapshot.keys.len() + snapshot.unaddressable;

        if snapshot.unaddressable > 0 {
            tracing::warn!(
                count = snapshot.unaddressable,
                path = %self.storage.root().display(),
                "Entries with non UTF-8 names are left for manual removal"
            );
            report.skipped += snapshot.unaddressable;
        }

        for key in snapshot.keys {
            let meta = match self.storage.stat(&key).await {
                Ok(meta) => meta,
                Err(StorageError::NotFound(_)) => {
                    tracing::debug!(key = %key, "Entry vanished before stat");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, key = %key, "Failed to stat stored file");
                    report.fail(&key, SweepStage::Stat, e);
                    continue;
                }
            };

            if !meta.is_file {
                report.skipped += 1;
                continue;
            }

            let age_days = age_in_days(now, DateTime::<Utc>::from(meta.modified));
            if age_days <= self.max_age_days {
                report.retained += 1;
                continue;
            }

            tracing::info!(
                key = %key,
                age_days,
                size_bytes = meta.len,
                "Deleting expired file"
            );

            match self.storage.delete(&key).await {
                Ok(true) => report.deleted += 1,
                Ok(false) => {
                    tracing::debug!(key = %key, "Entry already removed");
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, key = %key, "Failed to delete expired file");
                    report.fail(&key, SweepStage::Delete, e);
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            deleted = report.deleted,
            retained = report.retained,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Retention sweep finished"
        );

        report
    }
}

fn age_in_days(now: DateTime<Utc>, modified: DateTime<Utc>) -> f64 {
    (now - modified).num_milliseconds() as f64 / MILLIS_PER_DAY
}
