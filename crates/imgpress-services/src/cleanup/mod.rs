//! Retention of stored files.
//!
//! Anything in the storage directory older than the retention window is deleted once a
//! day. Age comes from the filesystem modification time; there is no index.

mod schedule;
mod service;

pub use schedule::DailySchedule;
pub use service::{RetentionSweeper, SweepFailure, SweepReport, SweepStage};
