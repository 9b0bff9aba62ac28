use std::path::PathBuf;

use anyhow::Result;
use commcal_core::{Occurrence, TimeWindow, expand};

use crate::render;

pub fn run(files: &[PathBuf], window: &TimeWindow, max: usize, json: bool) -> Result<()> {
    let events = super::load_events(files)?;

    let mut occurrences: Vec<Occurrence<'_>> = Vec::new();
    for event in &events {
        occurrences.extend(expand(event, window, max)?);
    }
    occurrences.sort_by_key(|o| o.start.to_utc());

    if json {
        println!("{}", to_json(&occurrences)?);
    } else {
        println!("{}", render::occurrence_list(&occurrences));
    }
    Ok(())
}

/// Flat records for downstream consumers (listing, stats).
fn to_json(occurrences: &[Occurrence<'_>]) -> Result<String> {
    let records: Vec<serde_json::Value> = occurrences
        .iter()
        .map(|o| {
            serde_json::json!({
                "event_id": o.event_id(),
                "title": o.title(),
                "description": o.description(),
                "organizer": o.organizer(),
                "start": o.start.to_string(),
                "end": o.end.to_string(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
