use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use commcal_core::{Event, EventTime, Frequency, RecurrenceRule};
use owo_colors::OwoColorize;
use slug::slugify;

pub fn run(
    title: String,
    start: &str,
    end: Option<&str>,
    duration: Option<&str>,
    description: Option<String>,
    organizer: Option<String>,
    repeat: Option<&str>,
    every: u32,
    count: Option<u32>,
    until: Option<&str>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let start_time: EventTime = start.parse()?;

    let end_time = match (end, duration) {
        (Some(e), _) => Some(e.parse()?),
        (None, Some(d)) => Some(apply_duration(&start_time, d)?),
        (None, None) => None,
    };

    let recurrence = build_rule(repeat, every, count, until)?;

    let event = Event::new(title, start_time, end_time, description, organizer, recurrence);
    event.validate()?;

    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(event_filename(&event));
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let toml = toml::to_string_pretty(&event).context("Could not serialize event")?;
    fs::write(&path, toml).with_context(|| format!("Could not write {}", path.display()))?;

    println!("{}", format!("Created: {}", path.display()).green());
    Ok(())
}

/// Apply a duration string to a start time to get the end time.
fn apply_duration(start: &EventTime, input: &str) -> Result<EventTime> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    Ok(match start {
        EventTime::Date(d) => EventTime::Date(*d + chrono_dur),
        EventTime::DateTime(dt) => EventTime::DateTime(*dt + chrono_dur),
    })
}

/// Assemble the recurrence rule from the repeat flags, if any.
fn build_rule(
    repeat: Option<&str>,
    every: u32,
    count: Option<u32>,
    until: Option<&str>,
) -> Result<Option<RecurrenceRule>> {
    let Some(repeat) = repeat else {
        if every != 1 || count.is_some() || until.is_some() {
            bail!("--every, --count, and --until require --repeat");
        }
        return Ok(None);
    };

    let frequency: Frequency = repeat.parse()?;
    let until = until
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid --until date \"{}\". Expected YYYY-MM-DD", s))
        })
        .transpose()?;

    let rule = RecurrenceRule {
        frequency,
        interval: every,
        until,
        count,
    };
    rule.validate()?;
    Ok(Some(rule))
}

/// Filename for an event definition: date (or a recurring marker), title
/// slug, and a short id suffix for uniqueness.
fn event_filename(event: &Event) -> String {
    let slug = slugify(&event.title);
    let short_id: String = event.id.chars().take(8).collect();

    match &event.recurrence {
        Some(_) => format!("recurring__{}_{}.toml", slug, short_id),
        None => {
            let date_part = match &event.start {
                EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
                EventTime::DateTime(dt) => dt.format("%Y-%m-%dT%H%M").to_string(),
            };
            format!("{}__{}_{}.toml", date_part, slug, short_id)
        }
    }
}
