pub mod config;
pub mod free;
pub mod grid;
pub mod list;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use weekboard_core::protocol::{DashboardPayload, read_dashboard_file};
use weekboard_core::user_directory::UserDirectory;
use weekboard_core::week::{parse_date, week_bounds};
use weekboard_core::{ViewContext, WeekboardConfig};

use crate::client::Client;

/// How long to wait for display names before rendering with placeholders
const USER_LOOKUP_TIMEOUT_MS: u64 = 1500;

/// Config, API client and view context shared by every command.
pub struct Session {
    pub config: WeekboardConfig,
    pub client: Client,
    pub ctx: ViewContext,
}

impl Session {
    pub fn load() -> Result<Self> {
        let config = WeekboardConfig::load()?;
        let client = Client::new(&config)?;
        let ctx = ViewContext::new(config.zone(), Utc::now()).with_hours(config.working_hours);

        tracing::debug!(server = %config.server_url, zone = ?ctx.zone, "loaded session");

        Ok(Self { config, client, ctx })
    }

    /// The viewer's uid, required by the dashboard views.
    pub fn require_uid(&self) -> Result<String> {
        match &self.config.uid {
            Some(uid) if !uid.trim().is_empty() => Ok(uid.trim().to_string()),
            _ => {
                let path = WeekboardConfig::config_path()?;
                anyhow::bail!(
                    "No uid configured.\n\n\
                    Add your uid to {}:\n  \
                    uid = \"+8613800000000\"\n\n\
                    or set WEEKBOARD_UID.",
                    path.display()
                );
            }
        }
    }

    /// Context re-evaluated at the current instant.
    pub fn refreshed_ctx(&self) -> ViewContext {
        ViewContext {
            now: Utc::now(),
            ..self.ctx
        }
    }

    /// Dashboard for the week starting at `week_start`, from a saved file or the server.
    pub async fn fetch_dashboard(&self, week_start: NaiveDate, file: Option<&Path>) -> Result<DashboardPayload> {
        match file {
            Some(path) => Ok(read_dashboard_file(path)?),
            None => {
                let (start, end) = week_bounds(week_start, &self.ctx);
                self.client.dashboard(start, end).await
            }
        }
    }
}

/// `YYYY-MM-DD` argument, or today in the viewer's zone.
pub fn resolve_day(arg: Option<&str>, ctx: &ViewContext) -> Result<NaiveDate> {
    match arg {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(ctx.today()),
    }
}

/// Look up display names for `uids`, giving up after a short wait.
pub async fn resolve_names(directory: &UserDirectory<Client>, uids: Vec<String>) {
    let Some(handle) = directory.request(uids) else {
        return;
    };

    match tokio::time::timeout(Duration::from_millis(USER_LOOKUP_TIMEOUT_MS), handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "user lookup task failed"),
        Err(_) => tracing::warn!("user lookup timed out, showing uids"),
    }
}
