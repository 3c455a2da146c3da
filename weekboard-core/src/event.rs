//! Event and calendar types as delivered by the scheduling API.
//!
//! Events are taken verbatim from the dashboard response. The normalizer only
//! fills in the annotation fields (`id`, `cname`, `timeZone`, `isBusy`,
//! `isBossProxy`, `calendarType`); nothing else is ever rewritten except the
//! `eid` of synthetic all-day copies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::protocol::lenient_offset;
use crate::timezone::Zone;

/// Marker inserted in the `eid` of synthetic per-day copies.
pub const COPY_MARKER: &str = "[copy]";

const ALL_DAY_FORMAT: &str = "%Y%m%d";

/// A meeting, event or live stream occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub eid: String,
    #[serde(default)]
    pub cid: String,
    #[serde(default)]
    pub host: String,
    /// Unix seconds
    pub start: i64,
    /// Unix seconds
    pub end: i64,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_all_day: bool,
    /// `YYYYMMDD`, only when `is_all_day`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day_start: Option<String>,
    /// `YYYYMMDD`, exclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day_end: Option<String>,
    #[serde(default)]
    pub is_live_stream: bool,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub receive_notification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlook_meeting_link: Option<String>,

    // Annotations added by the normalizer
    /// Owner uid
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    /// Owner's UTC offset in hours
    #[serde(default, deserialize_with = "lenient_offset", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<f64>,
    #[serde(default)]
    pub is_busy: bool,
    #[serde(default)]
    pub is_boss_proxy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_type: Option<CalendarType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    #[default]
    Attendee,
    Proxy,
    Merger,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Meeting,
    Event,
    #[serde(other)]
    Other,
}

/// Where an event originated. `secureMail*` covers every secure mail variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    #[default]
    Difft,
    Google,
    Outlook,
    SecureMail(String),
    Transfer,
    Other(String),
}

impl From<String> for Source {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "difft" => Source::Difft,
            "google" => Source::Google,
            "outlook" => Source::Outlook,
            "transfer" => Source::Transfer,
            s if s.starts_with("secureMail") => Source::SecureMail(raw),
            _ => Source::Other(raw),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        match source {
            Source::Difft => "difft".to_string(),
            Source::Google => "google".to_string(),
            Source::Outlook => "outlook".to_string(),
            Source::Transfer => "transfer".to_string(),
            Source::SecureMail(raw) | Source::Other(raw) => raw,
        }
    }
}

/// Role of the viewer on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarRole {
    #[default]
    Host,
    Proxy,
    Merger,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    #[serde(rename = "self")]
    Own,
    Proxy,
    Merge,
    Other,
}

impl Event {
    /// All-day event carrying both day bounds, eligible for per-day expansion.
    pub fn is_multi_day_all_day(&self) -> bool {
        self.category == Category::Event
            && self.is_all_day
            && self.all_day_start.is_some()
            && self.all_day_end.is_some()
    }

    /// Parsed `(allDayStart, allDayEnd)`; `None` when either is missing or malformed.
    pub fn all_day_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = parse_all_day(self.all_day_start.as_deref()?)?;
        let end = parse_all_day(self.all_day_end.as_deref()?)?;
        Some((start, end))
    }

    /// Synthetic copies must never be sent back to the server.
    pub fn is_copy(&self) -> bool {
        self.eid.contains(COPY_MARKER)
    }

    pub fn copy_for_day(&self, n: i64) -> Event {
        Event {
            eid: format!("{}{}{}", self.eid, COPY_MARKER, n),
            ..self.clone()
        }
    }

    /// Length in seconds, saturating for out of range timestamps.
    pub fn duration_seconds(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Zone of the event's owner as recorded on the event, else `default_offset_hours`.
    pub fn recorded_zone(&self, default_offset_hours: f64) -> Zone {
        Zone::fixed_hours(self.time_zone.unwrap_or(default_offset_hours))
    }

    pub fn display_topic(&self) -> &str {
        if self.topic.trim().is_empty() {
            "(No title)"
        } else {
            &self.topic
        }
    }
}

fn parse_all_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ALL_DAY_FORMAT).ok()
}

/// One calendar owned by, merged into, or proxied for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub cid: String,
    /// Owner uid
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    pub time_zone: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone_name: Option<String>,
    pub role: CalendarRole,
    pub calendar_type: CalendarType,
}

impl Calendar {
    pub fn zone(&self) -> Zone {
        Zone::resolve(self.time_zone_name.as_deref(), self.time_zone)
    }

    pub fn display_name(&self) -> &str {
        self.cname
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_event() -> Event {
        serde_json::from_value(serde_json::json!({
            "eid": "evt-1",
            "cid": "user_1001",
            "start": 1736125200,
            "end": 1736128800,
            "topic": "Design review",
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_minimal_event_uses_defaults() {
        let event = make_test_event();
        assert_eq!(event.role, Role::Attendee);
        assert_eq!(event.category, Category::Meeting);
        assert_eq!(event.source, Source::Difft);
        assert!(!event.is_all_day);
        assert_eq!(event.time_zone, None);
        assert_eq!(event.duration_seconds(), 3600);
    }

    #[test]
    fn test_unknown_enum_strings_do_not_fail() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "eid": "evt-2",
            "start": 0,
            "end": 60,
            "role": "observer",
            "category": "webinar",
            "source": "secureMailV2",
        }))
        .unwrap();

        assert_eq!(event.role, Role::Unknown);
        assert_eq!(event.category, Category::Other);
        assert_eq!(event.source, Source::SecureMail("secureMailV2".to_string()));
        assert_eq!(String::from(event.source), "secureMailV2");
    }

    #[test]
    fn test_all_day_range() {
        let mut event = make_test_event();
        event.category = Category::Event;
        event.is_all_day = true;
        event.all_day_start = Some("20250107".to_string());
        event.all_day_end = Some("20250110".to_string());

        assert!(event.is_multi_day_all_day());
        let (start, end) = event.all_day_range().unwrap();
        assert_eq!((end - start).num_days(), 3);

        event.all_day_end = Some("not-a-date".to_string());
        assert!(event.all_day_range().is_none());
    }

    #[test]
    fn test_copy_for_day_marks_eid() {
        let event = make_test_event();
        let copy = event.copy_for_day(2);
        assert_eq!(copy.eid, "evt-1[copy]2");
        assert!(copy.is_copy());
        assert!(!event.is_copy());
    }

    #[test]
    fn test_calendar_type_serializes_self() {
        assert_eq!(serde_json::to_string(&CalendarType::Own).unwrap(), "\"self\"");
        assert_eq!(serde_json::to_string(&CalendarType::Merge).unwrap(), "\"merge\"");
    }

    #[test]
    fn test_duration_seconds_saturates() {
        let mut event = make_test_event();
        event.start = i64::MIN + 1;
        event.end = i64::MAX;
        assert_eq!(event.duration_seconds(), i64::MAX);
    }

    #[test]
    fn test_recorded_zone_uses_given_default() {
        let mut event = make_test_event();
        assert_eq!(event.recorded_zone(0.0).offset_hours_at(0), 0.0);
        assert_eq!(event.recorded_zone(8.0).offset_hours_at(0), 8.0);

        event.time_zone = Some(-5.0);
        assert_eq!(event.recorded_zone(0.0).offset_hours_at(0), -5.0);
    }

    #[test]
    fn test_display_topic_falls_back() {
        let mut event = make_test_event();
        event.topic = "  ".to_string();
        assert_eq!(event.display_topic(), "(No title)");
    }
}
