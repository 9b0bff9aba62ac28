//! Query window for occurrence expansion.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CommCalError, CommCalResult};

/// The inclusive time window a query asks about.
///
/// Callers decide what "now" means and build a window from it; the engine
/// itself never reads a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CommCalResult<Self> {
        let window = TimeWindow { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Build a whole-day window: start of `from` through the last second of
    /// `to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> CommCalResult<Self> {
        // and_hms_opt(0/23, ..) cannot fail for an in-range NaiveDate
        let start = from.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = to.and_hms_opt(23, 59, 59).unwrap().and_utc();
        TimeWindow::new(start, end)
    }

    /// Re-check the bounds. The fields are public so deserialized or
    /// hand-built windows can exist; `expand` calls this defensively.
    pub fn validate(&self) -> CommCalResult<()> {
        if self.end < self.start {
            return Err(CommCalError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}
