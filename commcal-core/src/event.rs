//! Community-calendar event types.
//!
//! Events are the unit the rest of the system works with: the CLI stores
//! them as TOML files, the recurrence engine expands them, and the ICS
//! module exports their occurrences. The model mirrors what a community
//! calendar needs: a title, a date with an optional time, and optional
//! description/organizer/recurrence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CommCalError, CommCalResult};
use crate::recurrence::RecurrenceRule;

/// A calendar event.
///
/// `end` is optional; an event without one is a point-in-time marker.
/// `recurrence` is optional; absence means a one-off event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    pub start: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    /// Create an event with a freshly minted id.
    pub fn new(
        title: impl Into<String>,
        start: EventTime,
        end: Option<EventTime>,
        description: Option<String>,
        organizer: Option<String>,
        recurrence: Option<RecurrenceRule>,
    ) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            organizer,
            start,
            end,
            recurrence,
        }
    }

    /// Check the event invariants.
    ///
    /// Callers that accept events from the outside (files, requests) run
    /// this before handing the event to the engine; `expand` re-checks it
    /// defensively.
    pub fn validate(&self) -> CommCalResult<()> {
        if self.title.trim().is_empty() {
            return Err(CommCalError::InvalidEvent(
                "title must not be empty".to_string(),
            ));
        }

        if let Some(end) = &self.end {
            if !self.start.same_kind(end) {
                return Err(CommCalError::InvalidEvent(
                    "start and end must both be dates or both be date-times".to_string(),
                ));
            }
            if end.to_utc() < self.start.to_utc() {
                return Err(CommCalError::InvalidEvent(format!(
                    "end {} is before start {}",
                    end, self.start
                )));
            }
        }

        if let Some(rule) = &self.recurrence {
            rule.validate()?;
        }

        Ok(())
    }
}

/// A point on the calendar: either a whole day or an exact UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl EventTime {
    /// The instant this time maps to for comparisons. All-day values map to
    /// midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .unwrap_or(NaiveDateTime::MIN)
                .and_utc(),
            EventTime::DateTime(dt) => *dt,
        }
    }

    /// The calendar date this time falls on.
    pub fn date_naive(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTime(dt) => dt.date_naive(),
        }
    }

    /// Whether both values are the same variant (date vs date-time).
    pub fn same_kind(&self, other: &EventTime) -> bool {
        matches!(
            (self, other),
            (EventTime::Date(_), EventTime::Date(_))
                | (EventTime::DateTime(_), EventTime::DateTime(_))
        )
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

impl FromStr for EventTime {
    type Err = CommCalError;

    /// Accepts `YYYY-MM-DD` (all-day), `YYYY-MM-DDTHH:MM[:SS]` (assumed
    /// UTC), or full RFC 3339.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(EventTime::DateTime(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(EventTime::DateTime(naive.and_utc()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(EventTime::DateTime(naive.and_utc()));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(EventTime::Date(d));
        }

        Err(CommCalError::InvalidEvent(format!(
            "could not parse date/time \"{}\" (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM)",
            s
        )))
    }
}

impl TryFrom<String> for EventTime {
    type Error = CommCalError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EventTime> for String {
    fn from(t: EventTime) -> String {
        t.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Frequency;
    use chrono::TimeZone;

    fn timed(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> EventTime {
        EventTime::DateTime(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    #[test]
    fn parse_date_only() {
        let t: EventTime = "2026-07-15".parse().unwrap();
        assert_eq!(t, EventTime::Date(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()));
    }

    #[test]
    fn parse_datetime_without_seconds() {
        let t: EventTime = "2026-07-15T18:00".parse().unwrap();
        assert_eq!(t, timed(2026, 7, 15, 18, 0));
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let t: EventTime = "2026-07-15T20:00:00+02:00".parse().unwrap();
        assert_eq!(t, timed(2026, 7, 15, 18, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("next tuesday".parse::<EventTime>().is_err());
        assert!("2026-13-01".parse::<EventTime>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        for s in ["2026-07-15", "2026-07-15T18:00:00Z"] {
            let t: EventTime = s.parse().unwrap();
            assert_eq!(t.to_string(), s);
        }
    }

    #[test]
    fn validate_accepts_well_formed_event() {
        let event = Event::new(
            "Community BBQ",
            timed(2026, 7, 15, 18, 0),
            Some(timed(2026, 7, 15, 20, 0)),
            Some("Bring your own plates".to_string()),
            Some("Community Center".to_string()),
            None,
        );
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_title() {
        let event = Event::new("   ", timed(2026, 7, 15, 18, 0), None, None, None, None);
        assert!(matches!(
            event.validate(),
            Err(CommCalError::InvalidEvent(_))
        ));
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let event = Event::new(
            "Backwards",
            timed(2026, 7, 15, 18, 0),
            Some(timed(2026, 7, 15, 17, 0)),
            None,
            None,
            None,
        );
        assert!(matches!(
            event.validate(),
            Err(CommCalError::InvalidEvent(_))
        ));
    }

    #[test]
    fn validate_rejects_mixed_time_kinds() {
        let event = Event::new(
            "Mixed",
            EventTime::Date(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()),
            Some(timed(2026, 7, 15, 20, 0)),
            None,
            None,
            None,
        );
        assert!(matches!(
            event.validate(),
            Err(CommCalError::InvalidEvent(_))
        ));
    }

    #[test]
    fn validate_rejects_invalid_rule() {
        let mut event = Event::new("Weekly", timed(2026, 7, 15, 18, 0), None, None, None, None);
        event.recurrence = Some(RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 0,
            until: None,
            count: None,
        });
        assert!(matches!(event.validate(), Err(CommCalError::InvalidRule(_))));
    }

    #[test]
    fn event_toml_roundtrip() {
        let event = Event::new(
            "Book club",
            timed(2026, 9, 1, 19, 0),
            Some(timed(2026, 9, 1, 21, 0)),
            None,
            Some("Library".to_string()),
            Some(RecurrenceRule {
                frequency: Frequency::Monthly,
                interval: 1,
                until: None,
                count: Some(6),
            }),
        );

        let toml = toml::to_string(&event).unwrap();
        let parsed: Event = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn event_file_format_is_stable() {
        let toml = r#"
            id = "bbq-1"
            title = "Community BBQ"
            organizer = "Community Center"
            start = "2026-07-15T18:00:00Z"
            end = "2026-07-15T20:00:00Z"

            [recurrence]
            frequency = "weekly"
            interval = 2
            count = 10
        "#;

        let event: Event = toml::from_str(toml).unwrap();
        assert_eq!(event.title, "Community BBQ");
        assert_eq!(event.start, timed(2026, 7, 15, 18, 0));
        let rule = event.recurrence.unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.count, Some(10));
    }
}
