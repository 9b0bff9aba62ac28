//! Terminal rendering for occurrence listings.

use chrono::{Duration, NaiveDate};
use commcal_core::{EventTime, Occurrence};
use owo_colors::OwoColorize;

/// Render occurrences grouped by day, in chronological order.
pub fn occurrence_list(occurrences: &[Occurrence<'_>]) -> String {
    if occurrences.is_empty() {
        return format!("{}", "No occurrences in this window".dimmed());
    }

    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for occurrence in occurrences {
        let date = occurrence.start.date_naive();
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("{}", format_date_label(date).bold()));
            current_date = Some(date);
        }

        let mut line = format!(
            "  {} {}",
            format_time(&occurrence.start),
            occurrence.title()
        );
        if let Some(organizer) = occurrence.organizer() {
            line.push_str(&format!(" {}", format!("[{}]", organizer).dimmed()));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Human-readable day label (e.g. "Today", "Tomorrow", "Wed Jul 15 2026").
fn format_date_label(date: NaiveDate) -> String {
    let today = chrono::Local::now().date_naive();

    if date == today {
        "Today".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%a %b %-d %Y").to_string()
    }
}

fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => "all-day".to_string(),
        EventTime::DateTime(dt) => dt.format("%H:%M").to_string(),
    }
}

/// Compact start/end range for imported events.
pub fn format_imported_range(start: &EventTime, end: &EventTime) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{} .. {}", start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use commcal_core::Event;

    #[test]
    fn empty_list_renders_placeholder() {
        assert!(occurrence_list(&[]).contains("No occurrences"));
    }

    #[test]
    fn occurrences_on_one_day_share_a_header() {
        let event = Event {
            id: "evt-1".to_string(),
            title: "Morning swim".to_string(),
            description: None,
            organizer: Some("Pool".to_string()),
            start: EventTime::DateTime(Utc.with_ymd_and_hms(2026, 7, 15, 7, 0, 0).unwrap()),
            end: None,
            recurrence: None,
        };
        let occurrences = [
            Occurrence {
                event: &event,
                start: event.start,
                end: event.start,
            },
            Occurrence {
                event: &event,
                start: EventTime::DateTime(Utc.with_ymd_and_hms(2026, 7, 15, 19, 0, 0).unwrap()),
                end: EventTime::DateTime(Utc.with_ymd_and_hms(2026, 7, 15, 19, 0, 0).unwrap()),
            },
        ];

        let rendered = occurrence_list(&occurrences);
        assert!(rendered.contains("Morning swim"));
        assert!(rendered.contains("07:00"));
        assert!(rendered.contains("19:00"));
        assert!(rendered.contains("[Pool]"));
        // one day group only
        assert_eq!(rendered.matches("Jul").count(), 1);
    }

    #[test]
    fn all_day_occurrences_say_so() {
        assert_eq!(
            format_time(&EventTime::Date(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap())),
            "all-day"
        );
    }

    #[test]
    fn imported_range_collapses_points() {
        let at: EventTime = "2026-07-15T18:00".parse().unwrap();
        assert_eq!(format_imported_range(&at, &at), "2026-07-15T18:00:00Z");
        let end: EventTime = "2026-07-15T20:00".parse().unwrap();
        assert_eq!(
            format_imported_range(&at, &end),
            "2026-07-15T18:00:00Z .. 2026-07-15T20:00:00Z"
        );
    }
}
