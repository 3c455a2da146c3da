//! Free time between meetings inside working hours.
//!
//! Gaps shorter than the configured minimum, gaps that have already ended,
//! and anything outside working hours are never offered.

use chrono::NaiveDate;

use crate::format::{format_minutes, format_noon_and_midnight};
use crate::view::ViewContext;
use crate::week::BucketEntry;

/// A free interval shown between meeting rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    pub label: String,
    /// Left edge, unix seconds
    pub start: i64,
    /// Right edge, unix seconds
    pub end: i64,
    pub minutes: i64,
    /// Last gap of the day
    pub is_end: bool,
    pub disabled: bool,
}

/// One item of a day after gaps have been interleaved.
#[derive(Debug, Clone, PartialEq)]
pub enum DayItem {
    Meeting(BucketEntry),
    /// `anchor` is the eid the gap follows, or `None` for the leading and
    /// empty-day gaps.
    Gap { gap: Gap, anchor: Option<String> },
}

/// `"9:00 AM - 10:00 AM (1 hr free)"`
pub fn gap_label(left: i64, right: i64, minutes: i64, ctx: &ViewContext) -> String {
    format!(
        "{} - {} ({} free)",
        format_noon_and_midnight(ctx.zone.to_local(left)),
        format_noon_and_midnight(ctx.zone.to_local(right)),
        format_minutes(minutes)
    )
}

fn make_gap(left: i64, right: i64, is_end: bool, ctx: &ViewContext) -> Option<Gap> {
    let minutes = (right - left) / 60;
    if minutes < ctx.hours.min_gap_minutes || !ctx.is_future(right) {
        return None;
    }

    Some(Gap {
        label: gap_label(left, right, minutes, ctx),
        start: left,
        end: right,
        minutes,
        is_end,
        disabled: false,
    })
}

/// Free time before the first meeting of the day.
///
/// The left edge never lies before now. A first meeting that starts before
/// working hours leaves no leading gap.
pub fn prefix_gap(first_start: i64, day: NaiveDate, ctx: &ViewContext) -> Option<Gap> {
    let (day_open, day_close) = ctx.working_window(day);
    if first_start < day_open {
        return None;
    }

    let right = first_start.min(day_close);
    let left = ctx.now_ts().max(day_open);
    make_gap(left, right, false, ctx)
}

/// Free time after a meeting ending at `current_end`.
///
/// `latest_end` is the latest end seen so far that day, so a meeting nested
/// inside a longer one cannot reopen time the longer one still covers.
/// `next_start` is `None` after the last meeting of the day.
pub fn gap_after(
    current_end: i64,
    next_start: Option<i64>,
    latest_end: i64,
    day: NaiveDate,
    ctx: &ViewContext,
) -> Option<Gap> {
    let (day_open, day_close) = ctx.working_window(day);
    let current_end = current_end.max(latest_end);

    let Some(next_start) = next_start else {
        let left = day_open.max(current_end);
        if left >= day_close {
            return None;
        }
        return make_gap(left, day_close, true, ctx);
    };

    if next_start <= current_end {
        return None;
    }

    let (left, right) = if current_end <= day_open {
        if next_start <= day_open {
            return None;
        } else if next_start <= day_close {
            (day_open, next_start)
        } else {
            (day_open, day_close)
        }
    } else if current_end < day_close {
        if next_start <= day_close {
            (current_end, next_start)
        } else {
            (current_end, day_close)
        }
    } else {
        return None;
    };

    make_gap(left, right, false, ctx)
}

/// The single row shown for a day without meetings.
pub fn empty_day_gap(day: NaiveDate, ctx: &ViewContext) -> Gap {
    let (day_open, day_close) = ctx.working_window(day);
    let left = ctx.now_ts().max(day_open);

    if left >= day_close {
        return Gap {
            label: "No Meeting".to_string(),
            start: left,
            end: day_close,
            minutes: 0,
            is_end: true,
            disabled: true,
        };
    }

    Gap {
        label: format!(
            "{} - {} (all day free)",
            format_noon_and_midnight(ctx.zone.to_local(left)),
            format_noon_and_midnight(ctx.zone.to_local(day_close))
        ),
        start: left,
        end: day_close,
        minutes: (day_close - left) / 60,
        is_end: true,
        disabled: false,
    }
}

/// Interleave a sorted day bucket with its free gaps.
pub fn interleave_gaps(entries: Vec<BucketEntry>, day: NaiveDate, ctx: &ViewContext) -> Vec<DayItem> {
    let Some(first) = entries.first() else {
        return vec![DayItem::Gap {
            gap: empty_day_gap(day, ctx),
            anchor: None,
        }];
    };

    let mut items = Vec::with_capacity(entries.len() * 2 + 1);
    if let Some(gap) = prefix_gap(first.event.start, day, ctx) {
        items.push(DayItem::Gap { gap, anchor: None });
    }

    let next_starts: Vec<Option<i64>> = entries
        .iter()
        .skip(1)
        .map(|e| Some(e.event.start))
        .chain(std::iter::once(None))
        .collect();

    let mut latest_end = i64::MIN;
    for (entry, next_start) in entries.into_iter().zip(next_starts) {
        latest_end = latest_end.max(entry.event.end);
        let gap = gap_after(entry.event.end, next_start, latest_end, day, ctx);
        let anchor = entry.event.eid.clone();

        items.push(DayItem::Meeting(entry));
        if let Some(gap) = gap {
            items.push(DayItem::Gap {
                gap,
                anchor: Some(anchor),
            });
        }
    }

    items
}
