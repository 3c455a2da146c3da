//! Find a time that suits everyone in a free/busy response.
//!
//! Busy time of all users is merged into disjoint intervals; the free slots
//! between them follow the same rules as the week list gaps.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::gaps::{Gap, gap_after, gap_label, prefix_gap};
use crate::protocol::FreeBusyUser;
use crate::view::ViewContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyInterval {
    pub start: i64,
    pub end: i64,
    /// Users busy somewhere inside this interval
    pub uids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeSlot {
    pub start: i64,
    pub end: i64,
    pub minutes: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeBusyDay {
    pub day: NaiveDate,
    pub busy: Vec<BusyInterval>,
    pub free: Vec<FreeSlot>,
}

/// Coalesce overlapping and touching intervals.
pub fn merge_busy(mut intervals: Vec<BusyInterval>) -> Vec<BusyInterval> {
    intervals.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
                for uid in interval.uids {
                    if !last.uids.contains(&uid) {
                        last.uids.push(uid);
                    }
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Busy intervals of every user touching `day`.
pub fn busy_intervals(users: &[FreeBusyUser], day: NaiveDate, ctx: &ViewContext) -> Vec<BusyInterval> {
    let day_start = ctx.zone.start_of_day(day);
    let day_end = ctx.zone.start_of_day(day + Duration::days(1));

    let intervals = users
        .iter()
        .flat_map(|user| {
            user.events
                .iter()
                .filter(|e| e.end > e.start)
                .filter(move |e| e.end > day_start && e.start < day_end)
                .map(move |e| BusyInterval {
                    start: e.start,
                    end: e.end,
                    uids: vec![user.uid.clone()],
                })
        })
        .collect();

    merge_busy(intervals)
}

/// Start a slot no earlier than now, dropping it if it becomes too short.
fn clip_to_now(gap: Gap, ctx: &ViewContext) -> Option<FreeSlot> {
    let start = gap.start.max(ctx.now_ts());
    let minutes = (gap.end - start) / 60;
    if minutes < ctx.hours.min_gap_minutes {
        return None;
    }

    let label = if start == gap.start {
        gap.label
    } else {
        gap_label(start, gap.end, minutes, ctx)
    };

    Some(FreeSlot {
        start,
        end: gap.end,
        minutes,
        label,
    })
}

/// Free slots inside working hours on `day` where no user is busy.
pub fn find_free_slots(users: &[FreeBusyUser], day: NaiveDate, ctx: &ViewContext) -> FreeBusyDay {
    let busy = busy_intervals(users, day, ctx);
    let (_, day_close) = ctx.working_window(day);

    let mut gaps = Vec::new();
    match busy.first() {
        None => gaps.extend(prefix_gap(day_close, day, ctx)),
        Some(first) => {
            gaps.extend(prefix_gap(first.start, day, ctx));
            for (i, interval) in busy.iter().enumerate() {
                let next_start = busy.get(i + 1).map(|next| next.start);
                gaps.extend(gap_after(interval.end, next_start, interval.end, day, ctx));
            }
        }
    }

    let free: Vec<FreeSlot> = gaps.into_iter().filter_map(|gap| clip_to_now(gap, ctx)).collect();

    tracing::debug!(
        %day,
        users = users.len(),
        busy = busy.len(),
        free = free.len(),
        "computed free slots"
    );

    FreeBusyDay { day, busy, free }
}
