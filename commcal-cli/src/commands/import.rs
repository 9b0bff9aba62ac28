use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use commcal_core::ics::parse_events;
use owo_colors::OwoColorize;

use crate::render;

pub fn run(file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let events = parse_events(&content)?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        let when = render::format_imported_range(&event.start, &event.end);
        let mut line = format!("{} {}", when, event.title.bold());
        if let Some(organizer) = &event.organizer {
            line.push_str(&format!(" {}", format!("[{}]", organizer).dimmed()));
        }
        println!("{}", line);
    }
    println!();
    println!("{} event(s)", events.len());
    Ok(())
}
