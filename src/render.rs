//! Colored terminal rendering for weekboard-core types.

use owo_colors::OwoColorize;
use weekboard_core::format::format_noon_and_midnight;
use weekboard_core::freebusy::{BusyInterval, FreeSlot};
use weekboard_core::grid::{EventTitle, GridEvent};
use weekboard_core::rows::{Row, RowKind};
use weekboard_core::{Calendar, CalendarType, Zone};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Row {
    fn render(&self) -> String {
        match &self.kind {
            RowKind::Title { data, .. } => data.bold().to_string(),
            RowKind::Data {
                event,
                duration,
                disabled,
            } => {
                let line = format!("  {:<28} {}", duration, event.display_topic());
                if *disabled {
                    line.dimmed().to_string()
                } else if event.is_busy {
                    line.yellow().to_string()
                } else {
                    line
                }
            }
            RowKind::Gap { data, disabled, .. } => {
                if *disabled {
                    format!("  {}", data.dimmed())
                } else {
                    format!("  {}", data.green())
                }
            }
        }
    }
}

impl Render for EventTitle {
    fn render(&self) -> String {
        match self {
            EventTitle::Compact { text } => text.clone(),
            EventTitle::Full { topic, time_range } => {
                format!("{} {}", topic, time_range.dimmed())
            }
        }
    }
}

impl Render for GridEvent {
    fn render(&self) -> String {
        let start = format_noon_and_midnight(self.start);
        format!("  {:>12}  {}", start.dimmed(), self.title.render())
    }
}

impl Render for Calendar {
    fn render(&self) -> String {
        let kind = match self.calendar_type {
            CalendarType::Own => "mine",
            CalendarType::Proxy => "proxy",
            CalendarType::Merge => "merged",
            CalendarType::Other => "other",
        };
        format!("📅 {} {}", self.display_name(), format!("({}, {})", self.id, kind).dimmed())
    }
}

impl Render for FreeSlot {
    fn render(&self) -> String {
        format!("  {}", self.label.green())
    }
}

/// Busy intervals need the viewer zone to print their bounds.
pub fn render_busy(interval: &BusyInterval, zone: Zone) -> String {
    let range = format!(
        "{} - {}",
        format_noon_and_midnight(zone.to_local(interval.start)),
        format_noon_and_midnight(zone.to_local(interval.end))
    );
    format!("  {} {}", range.red(), interval.uids.join(", ").dimmed())
}
