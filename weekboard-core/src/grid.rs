//! Events for the multi-calendar grid view.

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

use crate::event::Event;
use crate::format::format_noon_and_midnight;
use crate::ids::cid_to_uid;
use crate::settings::WorkingHours;
use crate::timezone::Zone;

/// Title of a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EventTitle {
    /// Short meetings fit topic and start on one line
    Compact { text: String },
    Full { topic: String, time_range: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEvent {
    pub event: Event,
    /// Owner uid
    pub owner: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub title: EventTitle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridList {
    pub list: Vec<GridEvent>,
    pub has_cross_day_event: bool,
}

fn owner_of(event: &Event, viewer_uid: &str) -> String {
    if event.id.is_empty() {
        cid_to_uid(&event.cid, viewer_uid)
    } else {
        event.id.clone()
    }
}

/// Concrete bounds in `zone`. All-day events span their whole days.
fn event_bounds(event: &Event, zone: Zone) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    if event.is_all_day {
        if let Some((first, last_exclusive)) = event.all_day_range() {
            return (
                zone.to_local(zone.start_of_day(first)),
                zone.to_local(zone.start_of_day(last_exclusive)),
            );
        }
    }
    (zone.to_local(event.start), zone.to_local(event.end))
}

fn build_title(event: &Event, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, hours: &WorkingHours) -> EventTitle {
    let topic = event.display_topic().to_string();

    if event.is_all_day {
        return EventTitle::Full {
            topic,
            time_range: "All Day".to_string(),
        };
    }

    if event.duration_seconds() <= hours.short_meeting_minutes.saturating_mul(60) {
        return EventTitle::Compact {
            text: format!("{}, {}", topic, format_noon_and_midnight(start)),
        };
    }

    EventTitle::Full {
        topic,
        time_range: format!(
            "{} - {}",
            format_noon_and_midnight(start),
            format_noon_and_midnight(end)
        ),
    }
}

/// Keep events whose owner is checked and convert them for display.
///
/// The viewer's own events are shown in `viewer_zone`; everyone else's in the
/// offset recorded on the event, or the configured default when it has none.
pub fn filter_calendar_list(
    events: &[Event],
    checked: &HashSet<String>,
    viewer_uid: &str,
    viewer_zone: Zone,
    hours: &WorkingHours,
) -> GridList {
    let mut seen = HashSet::new();
    let mut grid = GridList::default();

    for event in events {
        if !seen.insert(format!("{}_{}", event.cid, event.eid)) {
            continue;
        }

        let owner = owner_of(event, viewer_uid);
        if !checked.contains(&owner) {
            continue;
        }

        let zone = if owner == viewer_uid {
            viewer_zone
        } else {
            event.recorded_zone(hours.default_offset_hours)
        };
        let (start, end) = event_bounds(event, zone);

        let last_instant = if end > start { end - Duration::seconds(1) } else { end };
        if event.is_all_day || start.date_naive() != last_instant.date_naive() {
            grid.has_cross_day_event = true;
        }

        let title = build_title(event, start, end, hours);
        grid.list.push(GridEvent {
            event: event.clone(),
            owner,
            start,
            end,
            title,
        });
    }

    tracing::debug!(
        kept = grid.list.len(),
        cross_day = grid.has_cross_day_event,
        "filtered grid events"
    );

    grid
}
