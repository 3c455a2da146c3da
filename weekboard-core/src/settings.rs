//! User configuration at ~/.config/weekboard/config.toml
//!
//! Values can be overridden with `WEEKBOARD_*` environment variables, e.g.
//! `WEEKBOARD_SERVER_URL` or `WEEKBOARD_WORKING_HOURS__START_HOUR`.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{WeekboardError, WeekboardResult};
use crate::timezone::{DEFAULT_OFFSET_HOURS, Zone};

static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Window in which free time is offered and the thresholds applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
    /// Gaps shorter than this are not shown
    pub min_gap_minutes: i64,
    /// Meetings this long or shorter get a compact title in the grid
    pub short_meeting_minutes: i64,
    pub default_offset_hours: f64,
}

impl Default for WorkingHours {
    fn default() -> Self {
        WorkingHours {
            start_hour: 9,
            end_hour: 18,
            min_gap_minutes: 30,
            short_meeting_minutes: 25,
            default_offset_hours: DEFAULT_OFFSET_HOURS,
        }
    }
}

impl WorkingHours {
    /// Clamp hours into a valid, non-empty window.
    pub fn sanitized(mut self) -> Self {
        self.end_hour = self.end_hour.clamp(1, 23);
        self.start_hour = self.start_hour.min(self.end_hour - 1);
        self.min_gap_minutes = self.min_gap_minutes.max(1);
        self.short_meeting_minutes = self.short_meeting_minutes.max(0);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekboardConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// The viewer's uid (`+<digits>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// IANA name or signed UTC offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default)]
    pub working_hours: WorkingHours,
}

impl Default for WeekboardConfig {
    fn default() -> Self {
        WeekboardConfig {
            server_url: default_server_url(),
            uid: None,
            timezone: None,
            token: None,
            working_hours: WorkingHours::default(),
        }
    }
}

impl WeekboardConfig {
    pub fn config_path() -> WeekboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WeekboardError::Config("Could not determine config directory".into()))?
            .join("weekboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template on first run.
    pub fn load() -> WeekboardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WeekboardResult<Self> {
        let mut config: WeekboardConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("WEEKBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| WeekboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WeekboardError::Config(e.to_string()))?;

        config.working_hours = config.working_hours.sanitized();
        Ok(config)
    }

    /// The viewer's zone; an unparseable setting falls back to the default offset.
    pub fn zone(&self) -> Zone {
        match self.timezone.as_deref() {
            Some(raw) => Zone::parse(raw).unwrap_or_else(|| {
                tracing::warn!(timezone = raw, "unparseable timezone in config, using default offset");
                Zone::fixed_hours(self.working_hours.default_offset_hours)
            }),
            None => Zone::fixed_hours(self.working_hours.default_offset_hours),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WeekboardResult<()> {
        let contents = format!(
            "\
# weekboard configuration

# Scheduling API base URL:
# server_url = \"{}\"

# Your uid and timezone (IANA name or UTC offset):
# uid = \"+8613800000000\"
# timezone = \"Asia/Shanghai\"

# [working_hours]
# start_hour = 9
# end_hour = 18
# min_gap_minutes = 30
# short_meeting_minutes = 25
# default_offset_hours = 8
",
            DEFAULT_SERVER_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WeekboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WeekboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
