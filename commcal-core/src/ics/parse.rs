//! ICS parsing.
//!
//! A deliberately small line-based parser: unfold, split properties, and
//! collect the fields the commcal model carries. It accepts anything a
//! conforming producer emits for those fields, which is all `import` and the
//! export round-trip need.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::error::{CommCalError, CommCalResult};
use crate::event::EventTime;

/// An event reconstructed from calendar interchange text.
///
/// Owned, unlike [`crate::recurrence::Occurrence`]: imported data has no
/// source `Event` to borrow from.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEvent {
    pub uid: String,
    pub title: String,
    pub description: Option<String>,
    pub organizer: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

/// Parse every VEVENT in an ICS document.
///
/// A VEVENT without DTSTART is an error; a missing DTEND yields a
/// point-in-time event (`end == start`).
pub fn parse_events(content: &str) -> CommCalResult<Vec<ImportedEvent>> {
    let mut events = Vec::new();
    let mut pending: Option<PendingEvent> = None;

    for line in unfold(content) {
        match line.as_str() {
            "BEGIN:VEVENT" => {
                pending = Some(PendingEvent::default());
            }
            "END:VEVENT" => {
                if let Some(p) = pending.take() {
                    events.push(p.finish()?);
                }
            }
            _ => {
                if let Some(p) = pending.as_mut() {
                    if let Some((key, params, value)) = parse_property_line(&line) {
                        p.apply(&key, &params, value);
                    }
                }
            }
        }
    }

    Ok(events)
}

/// Undo RFC 5545 line folding: continuation lines start with a single space
/// or tab, which is stripped while the rest is appended to the previous
/// line.
fn unfold(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in content.lines() {
        if raw.starts_with(' ') || raw.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&raw[1..]);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

#[derive(Default)]
struct PendingEvent {
    uid: Option<String>,
    title: Option<String>,
    description: Option<String>,
    organizer: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

impl PendingEvent {
    fn apply(&mut self, key: &str, params: &str, value: String) {
        match key {
            "UID" => self.uid = Some(value),
            "SUMMARY" => self.title = Some(value),
            "DESCRIPTION" => self.description = Some(value),
            "ORGANIZER" => self.organizer = Some(parse_organizer(params, &value)),
            "DTSTART" => self.start = parse_time(&value, params),
            "DTEND" => self.end = parse_time(&value, params),
            _ => {}
        }
    }

    fn finish(self) -> CommCalResult<ImportedEvent> {
        let start = self.start.ok_or_else(|| {
            CommCalError::IcsParse("VEVENT is missing a parseable DTSTART".to_string())
        })?;
        Ok(ImportedEvent {
            uid: self.uid.unwrap_or_default(),
            title: self.title.unwrap_or_else(|| "(No title)".to_string()),
            description: self.description,
            organizer: self.organizer,
            start,
            end: self.end.unwrap_or(start),
        })
    }
}

/// Split an ICS property line into key, parameters, and unescaped value.
fn parse_property_line(line: &str) -> Option<(String, String, String)> {
    let colon_pos = line.find(':')?;
    let key_part = &line[..colon_pos];
    let value = &line[colon_pos + 1..];

    let mut parts = key_part.splitn(2, ';');
    let key = parts.next()?.to_string();
    let params = parts.next().unwrap_or("").to_string();

    Some((key, params, unescape_ics_value(value)))
}

/// Unescape ICS property values per RFC 5545:
/// `\,` → `,`  `\;` → `;`  `\\` → `\`  `\n`/`\N` → newline
fn unescape_ics_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(',') => {
                    result.push(',');
                    chars.next();
                }
                Some(';') => {
                    result.push(';');
                    chars.next();
                }
                Some('\\') => {
                    result.push('\\');
                    chars.next();
                }
                Some('n') | Some('N') => {
                    result.push('\n');
                    chars.next();
                }
                _ => result.push(c), // keep backslash if not a recognized escape
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Parse a DTSTART/DTEND value: `YYYYMMDD` (with or without VALUE=DATE) or
/// `YYYYMMDDTHHMMSS[Z]`.
fn parse_time(value: &str, params: &str) -> Option<EventTime> {
    let is_date = params.contains("VALUE=DATE");

    if is_date || (value.len() == 8 && value.chars().all(|c| c.is_ascii_digit())) {
        let y = value.get(0..4)?.parse().ok()?;
        let m = value.get(4..6)?.parse().ok()?;
        let d = value.get(6..8)?.parse().ok()?;
        return Some(EventTime::Date(NaiveDate::from_ymd_opt(y, m, d)?));
    }

    if value.len() >= 15 && value.contains('T') {
        let y: i32 = value.get(0..4)?.parse().ok()?;
        let mo: u32 = value.get(4..6)?.parse().ok()?;
        let d: u32 = value.get(6..8)?.parse().ok()?;
        let h: u32 = value.get(9..11)?.parse().ok()?;
        let mi: u32 = value.get(11..13)?.parse().ok()?;
        let s: u32 = value.get(13..15)?.parse().ok()?;
        let dt = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single()?;
        return Some(EventTime::DateTime(dt));
    }

    None
}

/// Recover the organizer: prefer the CN parameter, fall back to the address
/// with any `mailto:` prefix stripped.
fn parse_organizer(params: &str, value: &str) -> String {
    for param in params.split(';') {
        if let Some(cn) = param.strip_prefix("CN=") {
            return cn.trim_matches('"').to_string();
        }
    }
    value.strip_prefix("mailto:").unwrap_or(value).to_string()
}
