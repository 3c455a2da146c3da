//! Partition a week of events into seven day buckets.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{WeekboardError, WeekboardResult};
use crate::event::{Event, Role};
use crate::format::calc_duration;
use crate::view::ViewContext;

pub const DAYS_IN_WEEK: usize = 7;

/// An event placed in a day bucket together with its duration label.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketEntry {
    pub event: Event,
    pub duration: String,
}

impl BucketEntry {
    pub fn is_copy(&self) -> bool {
        self.event.is_copy()
    }
}

/// Parse a `YYYY-MM-DD` day argument.
pub fn parse_date(raw: &str) -> WeekboardResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| WeekboardError::InvalidDate(raw.to_string()))
}

/// Monday of the week containing `day`.
pub fn week_start_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Unix seconds bounds `[start, end]` of the week beginning at `week_start`.
pub fn week_bounds(week_start: NaiveDate, ctx: &ViewContext) -> (i64, i64) {
    let start = ctx.zone.start_of_day(week_start);
    let end = ctx.zone.start_of_day(week_start + Duration::days(DAYS_IN_WEEK as i64)) - 1;
    (start, end)
}

/// Split the viewer's own events into seven buckets, one per day of the week.
///
/// Only events on calendars in `my_accounts` are kept; proxy events are
/// listed elsewhere. Ended events and events outside the week are dropped.
/// Multi-day all-day events get one synthetic copy per following day that
/// still falls inside the week. The bucket index is clamped to `0..=6`: an
/// event that began before the week lands on the first day. The upper clamp
/// only matters if the event's local day differs from the zone the week
/// bounds were computed in, since anything starting after the week's end has
/// already been dropped by the overlap check.
pub fn bucketize(
    events: &[Event],
    week_start: NaiveDate,
    my_accounts: &[String],
    ctx: &ViewContext,
) -> Vec<Vec<BucketEntry>> {
    let mut buckets: Vec<Vec<BucketEntry>> = vec![Vec::new(); DAYS_IN_WEEK];
    let (week_begin, week_end) = week_bounds(week_start, ctx);
    let last_index = DAYS_IN_WEEK as i64 - 1;

    let mut seen = HashSet::new();
    let mut mine: Vec<&Event> = events
        .iter()
        .filter(|e| my_accounts.iter().any(|cid| *cid == e.cid) && e.role != Role::Proxy)
        .filter(|e| seen.insert(e.eid.as_str()))
        .collect();
    mine.sort_by_key(|e| e.start);

    for event in mine {
        if ctx.is_past(event.end) {
            continue;
        }
        if event.end < week_begin || event.start > week_end {
            continue;
        }

        let diff = (ctx.zone.local_date(event.start) - week_start)
            .num_days()
            .clamp(0, last_index);
        let the_day = week_start + Duration::days(diff);

        let range = if event.is_multi_day_all_day() {
            event.all_day_range()
        } else {
            None
        };

        let Some((all_day_start, all_day_end)) = range else {
            let duration = calc_duration(ctx, event.start, event.end, the_day, event.is_all_day, None);
            buckets[diff as usize].push(BucketEntry {
                event: event.clone(),
                duration,
            });
            continue;
        };

        let day_count = (all_day_end - all_day_start).num_days();
        let passed_days = (week_start - all_day_start).num_days().max(0);

        let label = if day_count > 1 {
            format!("All Day (Day {}/{})", 1 + passed_days, day_count)
        } else {
            "All Day".to_string()
        };
        let duration = calc_duration(ctx, event.start, event.end, the_day, true, Some(&label));
        buckets[diff as usize].push(BucketEntry {
            event: event.clone(),
            duration,
        });

        for i in 1..=(day_count - passed_days - 1) {
            let index = diff + i;
            if index > last_index {
                break;
            }

            let copy = event.copy_for_day(i);
            let label = format!("All Day (Day {}/{})", i + 1 + passed_days, day_count);
            let day = week_start + Duration::days(index);
            let duration = calc_duration(ctx, copy.start, copy.end, day, true, Some(&label));
            buckets[index as usize].push(BucketEntry {
                event: copy,
                duration,
            });
        }
    }

    tracing::debug!(
        week = %week_start,
        rows = buckets.iter().map(Vec::len).sum::<usize>(),
        "bucketized week"
    );

    buckets
}
