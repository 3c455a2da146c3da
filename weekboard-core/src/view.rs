//! Per-render context shared by the list, gap and free/busy builders.

use chrono::{DateTime, NaiveDate, Utc};

use crate::settings::WorkingHours;
use crate::timezone::Zone;

/// Viewer zone, the instant the view is rendered at, and working hours.
///
/// Nothing in the pipeline reads the wall clock; `now` is always taken from
/// here so that re-rendering with the same context gives the same rows.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext {
    pub zone: Zone,
    pub now: DateTime<Utc>,
    pub hours: WorkingHours,
}

impl ViewContext {
    pub fn new(zone: Zone, now: DateTime<Utc>) -> Self {
        ViewContext {
            zone,
            now,
            hours: WorkingHours::default(),
        }
    }

    pub fn with_hours(mut self, hours: WorkingHours) -> Self {
        self.hours = hours.sanitized();
        self
    }

    pub fn now_ts(&self) -> i64 {
        self.now.timestamp()
    }

    /// `ts` (unix seconds) lies strictly before now.
    pub fn is_past(&self, ts: i64) -> bool {
        ts.saturating_mul(1000) < self.now.timestamp_millis()
    }

    /// `ts` (unix seconds) lies strictly after now.
    pub fn is_future(&self, ts: i64) -> bool {
        ts.saturating_mul(1000) > self.now.timestamp_millis()
    }

    /// Working window of `day` as `(start, end)` unix seconds.
    pub fn working_window(&self, day: NaiveDate) -> (i64, i64) {
        (
            self.zone.timestamp_at(day, self.hours.start_hour, 0),
            self.zone.timestamp_at(day, self.hours.end_hour, 0),
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.zone.local_date(self.now_ts())
    }
}
