use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use owo_colors::OwoColorize;
use weekboard_core::format::relative_day_label;
use weekboard_core::freebusy::find_free_slots;
use weekboard_core::protocol::read_free_busy_file;

use super::{Session, resolve_day};
use crate::render::{Render, render_busy};

pub async fn run(day: Option<String>, uids: Vec<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let session = Session::load()?;
    let day = resolve_day(day.as_deref(), &session.ctx)?;

    let mut uids = uids;
    if let Some(me) = session.config.uid.as_ref().filter(|u| !u.trim().is_empty()) {
        if !uids.contains(me) {
            uids.insert(0, me.clone());
        }
    }
    if uids.is_empty() {
        anyhow::bail!("No users given.\n\nPass one or more uids with --uid, or set uid in the config.");
    }

    let users = match file {
        Some(path) => read_free_busy_file(&path)?,
        None => {
            let start = session.ctx.zone.start_of_day(day);
            let end = session.ctx.zone.start_of_day(day + Duration::days(1));
            session.client.free_busy(&uids, start, end).await?
        }
    };

    let ctx = session.refreshed_ctx();
    let result = find_free_slots(&users, day, &ctx);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} {}", relative_day_label(day, &ctx).bold(), format!("({})", uids.join(", ")).dimmed());

    if !result.busy.is_empty() {
        println!("{}", "Busy".dimmed());
        for interval in &result.busy {
            println!("{}", render_busy(interval, ctx.zone));
        }
    }

    if result.free.is_empty() {
        println!("  {}", "No common free time".dimmed());
    } else {
        println!("{}", "Free".dimmed());
        for slot in &result.free {
            println!("{}", slot.render());
        }
    }

    Ok(())
}
