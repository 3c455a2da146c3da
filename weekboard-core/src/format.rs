//! Human readable labels for times, dates and durations.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};

use crate::timezone::Zone;
use crate::view::ViewContext;

fn plural(n: i64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `"30 mins"`, `"1 hr"`, `"1 hr 30 mins"`, `"2 days 3 hrs"`. Zero or less is empty.
pub fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return String::new();
    }
    if minutes < 60 {
        return plural(minutes, "min", "mins");
    }
    if minutes == 60 {
        return "1 hr".to_string();
    }

    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day", "days"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hr", "hrs"));
    }
    if mins > 0 {
        parts.push(plural(mins, "min", "mins"));
    }
    parts.join(" ")
}

pub fn format_days(days: i64) -> String {
    if days <= 0 {
        return String::new();
    }
    plural(days, "day", "days")
}

/// `h:mm A`, with `MIDNIGHT` for the midnight hour and `NOON` for the noon hour.
pub fn format_noon_and_midnight(dt: DateTime<FixedOffset>) -> String {
    let label = dt.format("%-I:%M %p").to_string();
    match dt.hour() {
        0 => label.replace("AM", "MIDNIGHT"),
        12 => label.replace("PM", "NOON"),
        _ => label,
    }
}

/// `ddd, MMM D`, e.g. `Mon, Jan 6`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Title of day `index` of the week starting at `week_start`.
pub fn format_week_day(week_start: NaiveDate, index: usize) -> String {
    format_date(week_start + Duration::days(index as i64))
}

/// Absolute start of an event, used when it is shown outside its own day.
pub fn format_time(ts: i64, zone: Zone, is_all_day: bool) -> String {
    let local = zone.to_local(ts);
    if is_all_day {
        format_date(local.date_naive())
    } else {
        format!("{} {}", format_date(local.date_naive()), format_noon_and_midnight(local))
    }
}

/// `Today`, `Tomorrow`, or the date.
pub fn relative_day_label(day: NaiveDate, ctx: &ViewContext) -> String {
    let today = ctx.today();
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        format_date(day)
    }
}

/// Label of a meeting row: `"<time> (<duration>)"`.
///
/// `the_day` is the day of the bucket the row is shown in. An override label
/// replaces the computed duration verbatim.
pub fn calc_duration(
    ctx: &ViewContext,
    start: i64,
    end: i64,
    the_day: NaiveDate,
    is_all_day: bool,
    override_label: Option<&str>,
) -> String {
    let seconds = end.saturating_sub(start) as f64;
    let duration = match override_label {
        Some(label) => label.to_string(),
        None if is_all_day => format_days((seconds / 86_400.0).round() as i64),
        None => format_minutes((seconds / 60.0).round() as i64),
    };

    let time = if ctx.zone.local_date(start) != the_day {
        format_time(start, ctx.zone, is_all_day)
    } else if is_all_day {
        relative_day_label(the_day, ctx)
    } else {
        format_noon_and_midnight(ctx.zone.to_local(start))
    };

    format!("{time} ({duration})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx_at(y: i32, m: u32, d: u32, h: u32) -> ViewContext {
        let zone = Zone::fixed_hours(8.0);
        let local = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap();
        ViewContext::new(zone, local.with_timezone(&Utc))
    }

    fn local_ts(d: u32, h: u32, min: u32) -> i64 {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, d, h, min, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "");
        assert_eq!(format_minutes(1), "1 min");
        assert_eq!(format_minutes(30), "30 mins");
        assert_eq!(format_minutes(60), "1 hr");
        assert_eq!(format_minutes(90), "1 hr 30 mins");
        assert_eq!(format_minutes(120), "2 hrs");
        assert_eq!(format_minutes(450), "7 hrs 30 mins");
        assert_eq!(format_minutes(24 * 60 + 1), "1 day 1 min");
        assert_eq!(format_minutes(3 * 24 * 60 + 2 * 60), "3 days 2 hrs");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(0), "");
        assert_eq!(format_days(1), "1 day");
        assert_eq!(format_days(4), "4 days");
    }

    #[test]
    fn test_noon_and_midnight() {
        let zone = Zone::fixed_hours(8.0);
        assert_eq!(format_noon_and_midnight(zone.to_local(local_ts(6, 0, 15))), "12:15 MIDNIGHT");
        assert_eq!(format_noon_and_midnight(zone.to_local(local_ts(6, 12, 0))), "12:00 NOON");
        assert_eq!(format_noon_and_midnight(zone.to_local(local_ts(6, 9, 5))), "9:05 AM");
        assert_eq!(format_noon_and_midnight(zone.to_local(local_ts(6, 18, 0))), "6:00 PM");
    }

    #[test]
    fn test_format_week_day() {
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(format_week_day(monday, 0), "Mon, Jan 6");
        assert_eq!(format_week_day(monday, 6), "Sun, Jan 12");
    }

    #[test]
    fn test_calc_duration_timed() {
        let ctx = ctx_at(2025, 1, 5, 12);
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let label = calc_duration(&ctx, local_ts(6, 10, 0), local_ts(6, 10, 30), day, false, None);
        assert_eq!(label, "10:00 AM (30 mins)");
    }

    #[test]
    fn test_calc_duration_all_day_relative() {
        let ctx = ctx_at(2025, 1, 6, 8);
        let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();

        assert_eq!(
            calc_duration(&ctx, local_ts(6, 0, 0), local_ts(7, 0, 0), today, true, Some("All Day")),
            "Today (All Day)"
        );
        assert_eq!(
            calc_duration(&ctx, local_ts(7, 0, 0), local_ts(8, 0, 0), tomorrow, true, Some("All Day")),
            "Tomorrow (All Day)"
        );
        assert_eq!(
            calc_duration(&ctx, local_ts(9, 0, 0), local_ts(11, 0, 0), later, true, None),
            "Thu, Jan 9 (2 days)"
        );
    }

    #[test]
    fn test_calc_duration_outside_own_day_uses_absolute_date() {
        let ctx = ctx_at(2025, 1, 6, 8);
        let shown_on = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let label = calc_duration(
            &ctx,
            local_ts(7, 0, 0),
            local_ts(10, 0, 0),
            shown_on,
            true,
            Some("All Day (Day 2/3)"),
        );
        assert_eq!(label, "Tue, Jan 7 (All Day (Day 2/3))");
    }
}
