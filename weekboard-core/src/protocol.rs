//! Scheduling API wire types.
//!
//! Every response is wrapped in `{status, reason?, data}`; a non-zero status
//! is an error. Payload lists are parsed leniently: anything that is not an
//! array reads as empty and malformed elements are dropped, so a partial
//! server response still renders.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{WeekboardError, WeekboardResult};
use crate::event::{CalendarRole, Event};
use crate::timezone::offset_from_value;
use crate::user_directory::UserInfo;

/// Response envelope shared by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> WeekboardResult<T> {
        if self.status != 0 {
            return Err(WeekboardError::Server {
                status: self.status,
                reason: self.reason.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        self.data.ok_or_else(|| WeekboardError::Server {
            status: self.status,
            reason: "response carried no data".to_string(),
        })
    }
}

/// `data` of the dashboard endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    #[serde(default)]
    pub version: u64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub my_calendar: Vec<CalendarRaw>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub other_calendar: Vec<CalendarRaw>,
}

/// One calendar entry of the dashboard payload with its events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRaw {
    pub cid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub time_zone: Option<f64>,
    #[serde(default)]
    pub time_zone_name: Option<String>,
    #[serde(default)]
    pub role: CalendarRole,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<Event>,
}

/// One user's entry in a free/busy response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyUser {
    pub uid: String,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub time_zone: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<Event>,
}

pub fn parse_dashboard(body: &str) -> WeekboardResult<DashboardPayload> {
    let response: ApiResponse<DashboardPayload> = serde_json::from_str(body)?;
    response.into_data()
}

pub fn parse_free_busy(body: &str) -> WeekboardResult<Vec<FreeBusyUser>> {
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(body)?;
    let data = response.into_data()?;
    Ok(list_from_value(data, "freebusy"))
}

/// `data` of the user lookup endpoint: a list of user records.
pub fn parse_users(body: &str) -> WeekboardResult<Vec<UserInfo>> {
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(body)?;
    let data = response.into_data()?;
    Ok(list_from_value(data, "users"))
}

/// Read a saved dashboard response, e.g. captured with `curl`.
pub fn read_dashboard_file(path: &Path) -> WeekboardResult<DashboardPayload> {
    let body = std::fs::read_to_string(path)?;
    parse_dashboard(&body)
}

pub fn read_free_busy_file(path: &Path) -> WeekboardResult<Vec<FreeBusyUser>> {
    let body = std::fs::read_to_string(path)?;
    parse_free_busy(&body)
}

/// Deserialize a list, reading non-arrays as empty and skipping bad elements.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(list_from_value(value, std::any::type_name::<T>()))
}

/// Deserialize a UTC offset given as a number or a string.
pub fn lenient_offset<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(offset_from_value))
}

fn list_from_value<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Vec<T> {
    let serde_json::Value::Array(items) = value else {
        if !value.is_null() {
            tracing::debug!(kind = what, "expected a list, treating as empty");
        }
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(kind = what, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_envelope() {
        let body = r#"{
            "status": 0,
            "data": {
                "version": 12,
                "myCalendar": [
                    {"cid": "user_1", "name": "Me", "timeZone": "+8", "role": "host",
                     "events": [{"eid": "e1", "start": 100, "end": 200, "topic": "Standup"}]}
                ],
                "otherCalendar": []
            }
        }"#;

        let payload = parse_dashboard(body).unwrap();
        assert_eq!(payload.version, 12);
        assert_eq!(payload.my_calendar.len(), 1);
        assert_eq!(payload.my_calendar[0].time_zone, Some(8.0));
        assert_eq!(payload.my_calendar[0].events[0].eid, "e1");
    }

    #[test]
    fn test_read_dashboard_file() {
        let path = std::env::temp_dir().join(format!("weekboard-dashboard-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"status":0,"data":{"version":3}}"#).unwrap();

        let payload = read_dashboard_file(&path).unwrap();
        assert_eq!(payload.version, 3);
        assert!(payload.my_calendar.is_empty());

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(read_dashboard_file(&path), Err(WeekboardError::Io(_))));
    }

    #[test]
    fn test_parse_users_skips_bad_records() {
        let body = r#"{"status":0,"data":[{"id":"+1","name":"Ann","timeZone":"+8"},{"name":"no id"}]}"#;
        let users = parse_users(body).unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ann");
        assert_eq!(users[0].time_zone, Some(8.0));
    }

    #[test]
    fn test_non_zero_status_is_error() {
        let body = r#"{"status": 5, "reason": "no permission"}"#;
        let err = parse_dashboard(body).unwrap_err();
        assert!(matches!(err, WeekboardError::Server { status: 5, .. }));
        assert!(err.to_string().contains("no permission"));
    }

    #[test]
    fn test_malformed_lists_read_as_empty() {
        let body = r#"{
            "status": 0,
            "data": {
                "version": 1,
                "myCalendar": {"oops": true},
                "otherCalendar": [
                    {"cid": "user_2", "events": "not-a-list", "timeZone": "garbage"},
                    {"name": "missing cid"}
                ]
            }
        }"#;

        let payload = parse_dashboard(body).unwrap();
        assert!(payload.my_calendar.is_empty());
        assert_eq!(payload.other_calendar.len(), 1);
        assert!(payload.other_calendar[0].events.is_empty());
        assert_eq!(payload.other_calendar[0].time_zone, None);
    }

    #[test]
    fn test_malformed_events_are_skipped() {
        let raw: CalendarRaw = serde_json::from_value(serde_json::json!({
            "cid": "user_3",
            "events": [
                {"eid": "ok", "start": 1, "end": 2},
                {"eid": "no-times"},
                42
            ]
        }))
        .unwrap();

        assert_eq!(raw.events.len(), 1);
        assert_eq!(raw.events[0].eid, "ok");
    }

    #[test]
    fn test_parse_free_busy() {
        let body = r#"{"status": 0, "data": [
            {"uid": "+1", "timeZone": -5, "events": [{"eid": "a", "start": 0, "end": 1800}]},
            {"uid": "+2"}
        ]}"#;

        let users = parse_free_busy(body).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].time_zone, Some(-5.0));
        assert!(users[1].events.is_empty());
    }
}
