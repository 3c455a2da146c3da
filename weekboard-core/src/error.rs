//! Error types for weekboard.

use thiserror::Error;

/// Errors that can occur outside the formatting pipeline.
///
/// The formatters themselves never fail; these cover configuration,
/// the scheduling API contract and the user directory.
#[derive(Error, Debug)]
pub enum WeekboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server returned status {status}: {reason}")]
    Server { status: i64, reason: String },

    #[error("server version is lower than client, just ignore")]
    StaleVersion { server: u64, client: u64 },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("User lookup failed: {0}")]
    UserLookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for WeekboardError {
    fn from(e: serde_json::Error) -> Self {
        WeekboardError::Serialization(e.to_string())
    }
}

/// Result type alias for weekboard operations.
pub type WeekboardResult<T> = Result<T, WeekboardError>;
