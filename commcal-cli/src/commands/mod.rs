pub mod expand;
pub mod export;
pub mod import;
pub mod new;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use commcal_core::{Event, TimeWindow};

/// Build the query window from CLI arguments.
///
/// "Now" lives here, not in the engine: a missing `--from` means today, a
/// missing `--to` means `from` plus the configured number of days.
pub fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    default_days: i64,
) -> Result<TimeWindow> {
    let today = Utc::now().date_naive();

    let from_date = match from {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let to_date = match to {
        Some(s) => parse_date(s)?,
        None => from_date + Duration::days(default_days),
    };

    Ok(TimeWindow::from_dates(from_date, to_date)?)
}

/// Parse YYYY-MM-DD.
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format \"{}\". Expected YYYY-MM-DD", s))
}

/// Load and validate event definition files.
pub fn load_events(files: &[PathBuf]) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for path in files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read event file {}", path.display()))?;
        let event: Event = toml::from_str(&content)
            .with_context(|| format!("Could not parse event file {}", path.display()))?;
        event
            .validate()
            .with_context(|| format!("Invalid event in {}", path.display()))?;
        events.push(event);
    }
    tracing::debug!(count = events.len(), "loaded event files");
    Ok(events)
}
