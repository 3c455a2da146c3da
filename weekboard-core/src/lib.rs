//! Core of weekboard: turns the scheduling API's dashboard and free/busy
//! payloads into week lists, grid events and free slots.
//!
//! - `dashboard` normalizes a payload into events plus calendars
//! - `week`, `gaps` and `rows` build the personal week list
//! - `grid` prepares events for the multi-calendar grid
//! - `freebusy` finds common free time
//! - `user_directory` resolves uids to display names without blocking

pub mod dashboard;
pub mod error;
pub mod event;
pub mod format;
pub mod freebusy;
pub mod gaps;
pub mod grid;
pub mod ids;
pub mod protocol;
pub mod rows;
pub mod settings;
pub mod timezone;
pub mod user_directory;
pub mod view;
pub mod week;

pub use dashboard::{Dashboard, VersionGuard};
pub use error::{WeekboardError, WeekboardResult};
pub use event::*;
pub use settings::{WeekboardConfig, WorkingHours};
pub use timezone::Zone;
pub use view::ViewContext;
