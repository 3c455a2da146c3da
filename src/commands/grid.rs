use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use weekboard_core::format::format_date;
use weekboard_core::grid::filter_calendar_list;
use weekboard_core::ids::{DEFAULT_CID, cid_to_uid};
use weekboard_core::user_directory::UserDirectory;
use weekboard_core::week::week_start_of;
use weekboard_core::Dashboard;

use super::{Session, resolve_day, resolve_names};
use crate::render::Render;

/// `calendars` are uids (or cids); empty means every calendar on the dashboard.
pub async fn run(week: Option<String>, calendars: Vec<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let session = Session::load()?;
    let viewer_uid = session.require_uid()?;
    let week_start = week_start_of(resolve_day(week.as_deref(), &session.ctx)?);

    let payload = session.fetch_dashboard(week_start, file.as_deref()).await?;
    let dashboard = Dashboard::normalize(payload, &viewer_uid, session.ctx.hours.default_offset_hours);

    let checked: HashSet<String> = if calendars.is_empty() {
        dashboard.calendars().map(|c| c.id.clone()).collect()
    } else {
        calendars
            .iter()
            .map(|c| {
                if c.starts_with("user_") || c == DEFAULT_CID {
                    cid_to_uid(c, &viewer_uid)
                } else {
                    c.clone()
                }
            })
            .collect()
    };

    let ctx = session.refreshed_ctx();
    let grid = filter_calendar_list(&dashboard.events, &checked, &viewer_uid, ctx.zone, &ctx.hours);

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    let directory = UserDirectory::new(session.client.clone());
    if file.is_none() {
        resolve_names(&directory, dashboard.referenced_uids()).await;
    }

    for calendar in dashboard.calendars().filter(|c| checked.contains(&c.id)) {
        println!("{}", calendar.render());
    }

    if grid.list.is_empty() {
        println!("\n{}", "No events found".dimmed());
        return Ok(());
    }

    let mut list: Vec<_> = grid.list.iter().collect();
    list.sort_by_key(|item| item.start);

    let mut current_date = None;
    for item in list {
        let date = item.start.date_naive();
        if current_date != Some(date) {
            println!("\n{}", format_date(date).bold());
            current_date = Some(date);
        }

        let owner = directory.get(&item.owner);
        println!("{} {}", item.render(), format!("[{}]", owner.display_name()).dimmed());
    }

    if grid.has_cross_day_event {
        println!("\n{}", "Includes all-day or multi-day events".dimmed());
    }

    Ok(())
}
