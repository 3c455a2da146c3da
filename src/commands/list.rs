use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use weekboard_core::rows::{Row, RowKind, build_week_list};
use weekboard_core::user_directory::{UserDirectory, UserInfoFetcher};
use weekboard_core::week::week_start_of;
use weekboard_core::{Dashboard, VersionGuard, WeekboardError};

use super::{Session, resolve_day, resolve_names};
use crate::render::Render;

pub async fn run(week: Option<String>, file: Option<PathBuf>, json: bool, watch: Option<u64>) -> Result<()> {
    let session = Session::load()?;
    let viewer_uid = session.require_uid()?;
    let week_start = week_start_of(resolve_day(week.as_deref(), &session.ctx)?);
    let directory = UserDirectory::new(session.client.clone());
    let mut guard = VersionGuard::default();

    loop {
        let payload = session.fetch_dashboard(week_start, file.as_deref()).await?;

        match guard.accept(payload.version) {
            Err(e @ WeekboardError::StaleVersion { .. }) => {
                tracing::debug!(error = %e, version = payload.version, "ignoring stale dashboard");
            }
            Err(e) => return Err(e.into()),
            Ok(()) => {
                let dashboard = Dashboard::normalize(payload, &viewer_uid, session.ctx.hours.default_offset_hours);
                if file.is_none() {
                    resolve_names(&directory, dashboard.referenced_uids()).await;
                }

                let ctx = session.refreshed_ctx();
                let rows = build_week_list(&dashboard.events, week_start, &dashboard.my_accounts(), &ctx);

                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print_rows(&rows, &viewer_uid, &directory);
                }
            }
        }

        let Some(secs) = watch else {
            break;
        };
        tokio::time::sleep(Duration::from_secs(secs.max(1))).await;
        if !json {
            println!();
        }
    }

    Ok(())
}

fn print_rows<F: UserInfoFetcher>(
    rows: &[Row],
    viewer_uid: &str,
    directory: &UserDirectory<F>,
) {
    for (i, row) in rows.iter().enumerate() {
        if row.is_title() && i > 0 {
            println!();
        }

        let host = match &row.kind {
            RowKind::Data { event, .. } if !event.host.is_empty() && event.host != viewer_uid => {
                Some(directory.get(&event.host))
            }
            _ => None,
        };

        match host {
            Some(user) => println!("{} {}", row.render(), format!("({})", user.display_name()).dimmed()),
            None => println!("{}", row.render()),
        }
    }
}
