//! ICS generation for expanded occurrences.

use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use super::CalendarMetadata;
use crate::error::{CommCalError, CommCalResult};
use crate::event::EventTime;
use crate::recurrence::Occurrence;

/// Generate a single .ics blob containing one VEVENT per occurrence.
///
/// The output is deterministic: UIDs derive from the event id and the
/// occurrence start, and DTSTAMP is pinned to the occurrence start rather
/// than the wall clock, so exporting the same occurrences twice yields
/// byte-identical text.
pub fn generate_ics(
    occurrences: &[Occurrence<'_>],
    metadata: &CalendarMetadata,
) -> CommCalResult<String> {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", &metadata.name));

    for occurrence in occurrences {
        cal.push(occurrence_vevent(occurrence)?);
    }

    let cal = cal.done();
    Ok(normalize_ics(&cal.to_string()))
}

fn occurrence_vevent(occurrence: &Occurrence<'_>) -> CommCalResult<icalendar::Event> {
    if occurrence.end.to_utc() < occurrence.start.to_utc() {
        return Err(CommCalError::MalformedOccurrence(format!(
            "occurrence of event '{}' ends ({}) before it starts ({})",
            occurrence.event_id(),
            occurrence.end,
            occurrence.start
        )));
    }

    let mut vevent = icalendar::Event::new();
    vevent.uid(&occurrence_uid(occurrence));
    vevent.summary(occurrence.title());

    // DTSTAMP is required by RFC 5545. Derive it from the occurrence start
    // instead of the current time so repeated exports stay identical.
    vevent.add_property(
        "DTSTAMP",
        occurrence.start.to_utc().format("%Y%m%dT%H%M%SZ").to_string(),
    );

    add_time_property(&mut vevent, "DTSTART", &occurrence.start);
    // Point-in-time markers carry no DTEND.
    if !occurrence.is_instant() {
        add_time_property(&mut vevent, "DTEND", &occurrence.end);
    }

    if let Some(description) = occurrence.description() {
        vevent.description(description);
    }
    if let Some(organizer) = occurrence.organizer() {
        vevent.append_property(organizer_property(organizer));
    }

    Ok(vevent.done())
}

/// Stable per-occurrence identifier: event id plus the occurrence start.
fn occurrence_uid(occurrence: &Occurrence<'_>) -> String {
    let stamp = match &occurrence.start {
        EventTime::Date(d) => d.format("%Y%m%d").to_string(),
        EventTime::DateTime(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
    };
    format!("{}-{}@commcal", occurrence.event_id(), stamp)
}

/// Add a DTSTART/DTEND property formatted per the EventTime variant.
fn add_time_property(vevent: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            vevent.append_property(prop);
        }
        EventTime::DateTime(dt) => {
            vevent.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
    }
}

/// ORGANIZER is a CAL-ADDRESS in the format; the model only carries free
/// text. A value that looks like an address is used directly, anything else
/// rides in the CN parameter over a placeholder address on the reserved
/// .invalid TLD.
fn organizer_property(organizer: &str) -> Property {
    if organizer.contains('@') {
        Property::new("ORGANIZER", format!("mailto:{}", organizer))
    } else {
        let mut prop = Property::new("ORGANIZER", "mailto:noreply@commcal.invalid");
        prop.add_parameter("CN", organizer);
        prop
    }
}

/// Clean up the icalendar crate's output:
/// - replace its PRODID with ours
/// - drop CALSCALE:GREGORIAN (it is the default)
fn normalize_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:-//commcal//commcal//EN\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }
    result
}
