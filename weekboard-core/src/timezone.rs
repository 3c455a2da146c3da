//! Timezone handling.
//!
//! The scheduling API reports zones two ways: a signed UTC offset in hours
//! (number or string) and, for proxy calendars, an IANA name. `Zone` unifies
//! both; the numeric offset is only ever derived from it for display.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Offset used when a calendar or event carries no usable zone (UTC+8).
pub const DEFAULT_OFFSET_HOURS: f64 = 8.0;

const MAX_OFFSET_HOURS: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for Zone {
    fn default() -> Self {
        Zone::fixed_hours(DEFAULT_OFFSET_HOURS)
    }
}

impl Zone {
    /// Fixed zone from an offset in hours. Out of range offsets fall back to
    /// the default.
    pub fn fixed_hours(hours: f64) -> Zone {
        let secs = if hours.is_finite() && hours.abs() <= MAX_OFFSET_HOURS {
            (hours * 3600.0).round() as i32
        } else {
            (DEFAULT_OFFSET_HOURS * 3600.0) as i32
        };

        Zone::Fixed(FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix()))
    }

    /// Prefer a parseable IANA name, otherwise use the numeric offset.
    pub fn resolve(name: Option<&str>, offset_hours: f64) -> Zone {
        if let Some(tz) = name.and_then(|n| n.trim().parse::<Tz>().ok()) {
            return Zone::Named(tz);
        }
        Zone::fixed_hours(offset_hours)
    }

    /// Parse either an IANA name (`Asia/Shanghai`) or a signed offset (`+8`).
    pub fn parse(raw: &str) -> Option<Zone> {
        let trimmed = raw.trim();
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Some(Zone::Named(tz));
        }
        parse_offset(trimmed).map(Zone::fixed_hours)
    }

    pub fn to_local(&self, ts: i64) -> DateTime<FixedOffset> {
        let utc = DateTime::from_timestamp(ts, 0).unwrap_or_default();
        match self {
            Zone::Named(tz) => utc.with_timezone(tz).fixed_offset(),
            Zone::Fixed(offset) => utc.with_timezone(offset),
        }
    }

    pub fn local_date(&self, ts: i64) -> NaiveDate {
        self.to_local(ts).date_naive()
    }

    /// Unix seconds of `date` at `hour:minute` local time.
    ///
    /// Ambiguous local times resolve to the earlier instant; times skipped by a
    /// DST jump resolve to the first valid instant after them.
    pub fn timestamp_at(&self, date: NaiveDate, hour: u32, minute: u32) -> i64 {
        let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or_default();
        let naive = date.and_time(time);

        match self {
            Zone::Fixed(offset) => naive.and_utc().timestamp() - i64::from(offset.local_minus_utc()),
            Zone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
                .map(|dt| dt.timestamp())
                .unwrap_or_else(|| naive.and_utc().timestamp()),
        }
    }

    pub fn start_of_day(&self, date: NaiveDate) -> i64 {
        self.timestamp_at(date, 0, 0)
    }

    /// UTC offset in hours at the given instant.
    pub fn offset_hours_at(&self, ts: i64) -> f64 {
        f64::from(self.to_local(ts).offset().local_minus_utc()) / 3600.0
    }
}

/// Parse a signed offset such as `8`, `+8`, `-5`, `5.5`, `UTC+8` or `GMT-3`.
pub fn parse_offset(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let upper = trimmed.to_ascii_uppercase();
    let body = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper)
        .trim();

    if body.is_empty() {
        return None;
    }

    body.parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && h.abs() <= MAX_OFFSET_HOURS)
}

/// Offset from a JSON value that may be a number or a string.
pub fn offset_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|h| h.is_finite() && h.abs() <= MAX_OFFSET_HOURS),
        serde_json::Value::String(s) => parse_offset(s),
        _ => None,
    }
}
