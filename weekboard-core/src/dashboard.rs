//! Normalize the dashboard payload into one event list plus the calendars
//! it came from.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{WeekboardError, WeekboardResult};
use crate::event::{Calendar, CalendarRole, CalendarType, Event, Role};
use crate::ids::cid_to_uid;
use crate::protocol::{CalendarRaw, DashboardPayload};

pub const BUSY_TOPIC: &str = "Busy";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub events: Vec<Event>,
    pub my_users: Vec<Calendar>,
    pub other_users: Vec<Calendar>,
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Mine,
    Other,
}

fn calendar_type(role: CalendarRole, group: Group) -> CalendarType {
    match (role, group) {
        (CalendarRole::Proxy, _) => CalendarType::Proxy,
        (CalendarRole::Merger, _) => CalendarType::Merge,
        (_, Group::Mine) => CalendarType::Own,
        (_, Group::Other) => CalendarType::Other,
    }
}

fn annotate(mut event: Event, calendar: &Calendar, group: Group) -> Event {
    if event.cid.is_empty() {
        event.cid = calendar.cid.clone();
    }
    event.id = calendar.id.clone();
    event.cname = calendar.cname.clone();
    event.time_zone = Some(calendar.time_zone);
    event.is_busy = group == Group::Other;
    if event.is_busy {
        event.topic = BUSY_TOPIC.to_string();
    }
    event.role = match calendar.role {
        CalendarRole::Proxy => Role::Proxy,
        CalendarRole::Merger => Role::Merger,
        _ => event.role,
    };
    event.is_boss_proxy = event.role == Role::Proxy;
    event.calendar_type = Some(calendar.calendar_type);
    event
}

/// Reduce one calendar group, skipping cids in `seen` and recording new ones.
fn reduce_group(
    raw: Vec<CalendarRaw>,
    group: Group,
    viewer_uid: &str,
    default_offset_hours: f64,
    seen: &mut HashSet<String>,
    events: &mut Vec<Event>,
) -> Vec<Calendar> {
    let mut calendars = Vec::with_capacity(raw.len());

    for entry in raw {
        if !seen.insert(entry.cid.clone()) {
            tracing::debug!(cid = %entry.cid, "skipping duplicate calendar");
            continue;
        }

        let calendar = Calendar {
            id: cid_to_uid(&entry.cid, viewer_uid),
            cname: entry.name.clone(),
            name: entry.name,
            time_zone: entry.time_zone.unwrap_or(default_offset_hours),
            time_zone_name: entry.time_zone_name,
            role: entry.role,
            calendar_type: calendar_type(entry.role, group),
            cid: entry.cid,
        };

        events.extend(entry.events.into_iter().map(|e| annotate(e, &calendar, group)));
        calendars.push(calendar);
    }

    calendars
}

impl Dashboard {
    /// Normalize a payload as seen by `viewer_uid`.
    ///
    /// A calendar listed in both groups is kept as the viewer's own. Events of
    /// foreign calendars are redacted to "Busy". Calendars without a usable
    /// `timeZone` get `default_offset_hours`.
    pub fn normalize(payload: DashboardPayload, viewer_uid: &str, default_offset_hours: f64) -> Dashboard {
        let mut seen = HashSet::new();
        let mut events = Vec::new();

        let mut my_users = reduce_group(
            payload.my_calendar,
            Group::Mine,
            viewer_uid,
            default_offset_hours,
            &mut seen,
            &mut events,
        );
        let other_users = reduce_group(
            payload.other_calendar,
            Group::Other,
            viewer_uid,
            default_offset_hours,
            &mut seen,
            &mut events,
        );

        my_users.sort_by_key(|c| c.id != viewer_uid);

        tracing::debug!(
            version = payload.version,
            events = events.len(),
            mine = my_users.len(),
            other = other_users.len(),
            "normalized dashboard"
        );

        Dashboard {
            events,
            my_users,
            other_users,
            version: payload.version,
        }
    }

    /// Cids whose events belong in the personal week list, the viewer's first.
    pub fn my_accounts(&self) -> Vec<String> {
        self.my_users
            .iter()
            .filter(|c| matches!(c.calendar_type, CalendarType::Own | CalendarType::Merge))
            .map(|c| c.cid.clone())
            .collect()
    }

    /// Every uid mentioned by calendars or event hosts, in first-seen order.
    pub fn referenced_uids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.my_users
            .iter()
            .chain(&self.other_users)
            .map(|c| c.id.as_str())
            .chain(self.events.iter().map(|e| e.host.as_str()))
            .filter(|uid| !uid.is_empty() && seen.insert(*uid))
            .map(str::to_string)
            .collect()
    }

    pub fn calendars(&self) -> impl Iterator<Item = &Calendar> {
        self.my_users.iter().chain(&self.other_users)
    }
}

/// Rejects dashboard responses older than one already accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionGuard {
    latest: Option<u64>,
}

impl VersionGuard {
    pub fn accept(&mut self, version: u64) -> WeekboardResult<()> {
        if let Some(latest) = self.latest {
            if version < latest {
                return Err(WeekboardError::StaleVersion {
                    server: version,
                    client: latest,
                });
            }
        }
        self.latest = Some(version);
        Ok(())
    }

    pub fn latest(&self) -> Option<u64> {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_dashboard;
    use crate::timezone::DEFAULT_OFFSET_HOURS;

    const VIEWER: &str = "+1001";

    fn payload() -> DashboardPayload {
        let body = serde_json::json!({
            "status": 0,
            "data": {
                "version": 7,
                "myCalendar": [
                    {
                        "cid": "user_3003",
                        "name": "Boss",
                        "role": "proxy",
                        "timeZone": "-5",
                        "timeZoneName": "America/New_York",
                        "events": [
                            {"eid": "p1", "cid": "user_3003", "host": "+3003", "start": 100, "end": 200, "topic": "Board", "role": "host"}
                        ]
                    },
                    {
                        "cid": "user_1001",
                        "name": "Me",
                        "role": "host",
                        "timeZone": 8,
                        "events": [
                            {"eid": "e1", "cid": "user_1001", "host": "+1001", "start": 100, "end": 200, "topic": "Standup", "role": "host"},
                            {"eid": "e2", "cid": "user_1001", "host": "+2002", "start": 300, "end": 400, "topic": "Sync"}
                        ]
                    }
                ],
                "otherCalendar": [
                    {
                        "cid": "user_2002",
                        "name": "Colleague",
                        "role": "host",
                        "timeZone": "+1",
                        "events": [
                            {"eid": "o1", "cid": "user_2002", "host": "+2002", "start": 100, "end": 200, "topic": "Secret interview"}
                        ]
                    },
                    {
                        "cid": "user_1001",
                        "name": "Me again",
                        "events": [
                            {"eid": "dup", "cid": "user_1001", "start": 1, "end": 2}
                        ]
                    }
                ]
            }
        })
        .to_string();
        parse_dashboard(&body).unwrap()
    }

    #[test]
    fn test_viewer_calendar_first() {
        let dashboard = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);

        assert_eq!(dashboard.my_users[0].id, VIEWER);
        assert_eq!(dashboard.my_users[0].calendar_type, CalendarType::Own);
        assert_eq!(dashboard.my_users[1].calendar_type, CalendarType::Proxy);
        assert_eq!(dashboard.version, 7);
    }

    #[test]
    fn test_no_cid_in_both_groups() {
        let dashboard = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);

        let mine: HashSet<&str> = dashboard.my_users.iter().map(|c| c.cid.as_str()).collect();
        assert!(dashboard.other_users.iter().all(|c| !mine.contains(c.cid.as_str())));
        assert_eq!(dashboard.other_users.len(), 1);
        assert!(dashboard.events.iter().all(|e| e.eid != "dup"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);
        let second = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);
        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_events_are_busy() {
        let dashboard = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);
        let foreign = dashboard.events.iter().find(|e| e.eid == "o1").unwrap();

        assert!(foreign.is_busy);
        assert_eq!(foreign.topic, "Busy");
        assert_eq!(foreign.calendar_type, Some(CalendarType::Other));
        assert_eq!(foreign.time_zone, Some(1.0));
        assert_eq!(foreign.id, "+2002");

        let own = dashboard.events.iter().find(|e| e.eid == "e1").unwrap();
        assert!(!own.is_busy);
        assert_eq!(own.topic, "Standup");
        assert_eq!(own.cname.as_deref(), Some("Me"));
    }

    #[test]
    fn test_proxy_calendar_marks_events() {
        let dashboard = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);
        let proxied = dashboard.events.iter().find(|e| e.eid == "p1").unwrap();

        assert_eq!(proxied.role, Role::Proxy);
        assert!(proxied.is_boss_proxy);
        assert_eq!(proxied.time_zone, Some(-5.0));

        let own = dashboard.events.iter().find(|e| e.eid == "e2").unwrap();
        assert_eq!(own.role, Role::Attendee);
        assert!(!own.is_boss_proxy);
    }

    #[test]
    fn test_my_accounts_and_referenced_uids() {
        let dashboard = Dashboard::normalize(payload(), VIEWER, DEFAULT_OFFSET_HOURS);

        assert_eq!(dashboard.my_accounts(), vec!["user_1001".to_string()]);
        assert_eq!(dashboard.referenced_uids(), vec!["+1001", "+3003", "+2002"]);
    }

    #[test]
    fn test_default_cid_maps_to_viewer() {
        let body = r#"{"status":0,"data":{"version":1,"myCalendar":[{"cid":"default","events":[]}]}}"#;
        let dashboard = Dashboard::normalize(parse_dashboard(body).unwrap(), VIEWER, DEFAULT_OFFSET_HOURS);

        assert_eq!(dashboard.my_users[0].id, VIEWER);
        assert_eq!(dashboard.my_users[0].time_zone, 8.0);
        assert_eq!(dashboard.my_accounts(), vec!["default".to_string()]);
    }

    #[test]
    fn test_missing_time_zone_uses_configured_default() {
        let body = r#"{"status":0,"data":{"version":3,"otherCalendar":[{"cid":"user_2002","events":[{"eid":"o1","start":100,"end":200}]}]}}"#;
        let dashboard = Dashboard::normalize(parse_dashboard(body).unwrap(), VIEWER, 0.0);

        assert_eq!(dashboard.other_users[0].time_zone, 0.0);
        assert_eq!(dashboard.events[0].time_zone, Some(0.0));
    }

    #[test]
    fn test_malformed_lists_are_empty() {
        let body = r#"{"status":0,"data":{"version":2,"myCalendar":{"oops":1},"otherCalendar":[{"cid":"user_9","events":"nope"}, 42]}}"#;
        let dashboard = Dashboard::normalize(parse_dashboard(body).unwrap(), VIEWER, DEFAULT_OFFSET_HOURS);

        assert!(dashboard.my_users.is_empty());
        assert_eq!(dashboard.other_users.len(), 1);
        assert!(dashboard.events.is_empty());
    }

    #[test]
    fn test_version_guard_rejects_stale() {
        let mut guard = VersionGuard::default();
        guard.accept(5).unwrap();
        guard.accept(5).unwrap();

        let err = guard.accept(4).unwrap_err();
        assert_eq!(err.to_string(), "server version is lower than client, just ignore");
        assert_eq!(guard.latest(), Some(5));

        guard.accept(9).unwrap();
        assert_eq!(guard.latest(), Some(9));
    }
}
