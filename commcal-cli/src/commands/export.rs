use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use commcal_core::ics::{CalendarMetadata, generate_ics};
use commcal_core::{Occurrence, TimeWindow, expand};
use owo_colors::OwoColorize;

pub fn run(
    files: &[PathBuf],
    window: &TimeWindow,
    max: usize,
    output: Option<PathBuf>,
    calendar_name: String,
) -> Result<()> {
    let events = super::load_events(files)?;

    let mut occurrences: Vec<Occurrence<'_>> = Vec::new();
    for event in &events {
        occurrences.extend(expand(event, window, max)?);
    }
    occurrences.sort_by_key(|o| o.start.to_utc());

    let metadata = CalendarMetadata {
        name: calendar_name,
    };
    let ics = generate_ics(&occurrences, &metadata)?;

    match output {
        Some(path) => {
            fs::write(&path, &ics)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!(
                "{}",
                format!(
                    "Exported {} occurrence(s) to {}",
                    occurrences.len(),
                    path.display()
                )
                .green()
            );
        }
        None => print!("{}", ics),
    }
    Ok(())
}
