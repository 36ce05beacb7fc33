use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::time::Duration;

/// A fixed time of day (UTC) at which a job fires once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32) -> Result<Self, anyhow::Error> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            anyhow::anyhow!("Invalid daily schedule time {:02}:{:02}", hour, minute)
        })?;
        Ok(Self { at })
    }

    /// Midnight UTC
    pub fn midnight() -> Self {
        Self {
            at: NaiveTime::MIN,
        }
    }

    /// First firing strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.at).and_utc();
        if today > now {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }

    /// How long to sleep from `now` until the next firing.
    pub fn until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self::midnight()
    }
}
