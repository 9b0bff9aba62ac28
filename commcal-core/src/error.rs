//! Error types for the commcal ecosystem.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur in commcal operations.
#[derive(Error, Debug)]
pub enum CommCalError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid window: end {end} is before start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Malformed occurrence: {0}")]
    MalformedOccurrence(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for commcal operations.
pub type CommCalResult<T> = Result<T, CommCalError>;
