//! Recurrence rules and occurrence expansion.
//!
//! Expands an event (recurring or not) into the concrete occurrences that
//! fall inside a query window. Candidate starts are always computed from the
//! event's original start, so a rule anchored on Jan 31 yields Feb 28 and
//! then Mar 31 rather than drifting to Mar 28.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CommCalError, CommCalResult};
use crate::event::{Event, EventTime};
use crate::window::TimeWindow;

/// Hard upper bound on generated candidates when the caller does not supply
/// its own cap. Guarantees termination for unbounded rules.
pub const DEFAULT_MAX_OCCURRENCES: usize = 10_000;

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = CommCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(CommCalError::InvalidRule(format!(
                "unrecognized frequency \"{}\" (expected daily, weekly, monthly, or yearly)",
                other
            ))),
        }
    }
}

/// A recurrence rule: frequency, interval, and at most one end condition.
///
/// Neither `until` nor `count` means the rule is unbounded; enumeration is
/// then bounded by the safety cap alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Inclusive end date: no occurrence starts after this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    /// Maximum number of occurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    /// Check the rule invariants: positive interval, positive count, and at
    /// most one end condition.
    pub fn validate(&self) -> CommCalResult<()> {
        if self.interval == 0 {
            return Err(CommCalError::InvalidRule(
                "interval must be positive".to_string(),
            ));
        }
        if self.count == Some(0) {
            return Err(CommCalError::InvalidRule(
                "count must be positive".to_string(),
            ));
        }
        if self.until.is_some() && self.count.is_some() {
            return Err(CommCalError::InvalidRule(
                "until and count are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One concrete instance of an event in time.
///
/// Occurrences are materialized per query and discarded afterwards; they
/// borrow their source event rather than duplicating its fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence<'a> {
    pub event: &'a Event,
    pub start: EventTime,
    pub end: EventTime,
}

impl<'a> Occurrence<'a> {
    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    pub fn title(&self) -> &str {
        &self.event.title
    }

    pub fn description(&self) -> Option<&str> {
        self.event.description.as_deref()
    }

    pub fn organizer(&self) -> Option<&str> {
        self.event.organizer.as_deref()
    }

    /// A point-in-time marker: the source event had no end.
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// Whether this occurrence, treated as the interval `[start, end)`,
    /// overlaps the inclusive window. Zero-duration occurrences match when
    /// their instant lies inside the window.
    pub fn intersects(&self, window: &TimeWindow) -> bool {
        let start = self.start.to_utc();
        let end = self.end.to_utc();
        if end == start {
            window.start <= start && start <= window.end
        } else {
            start <= window.end && end > window.start
        }
    }
}

/// Expand an event into the occurrences overlapping `window`, in
/// chronological order.
///
/// `max_occurrences` caps how many candidates are generated regardless of
/// the rule's own end condition; pass [`DEFAULT_MAX_OCCURRENCES`] unless the
/// caller has a reason to tighten it. Identical inputs always produce an
/// identical sequence.
pub fn expand<'a>(
    event: &'a Event,
    window: &TimeWindow,
    max_occurrences: usize,
) -> CommCalResult<Vec<Occurrence<'a>>> {
    event.validate()?;
    window.validate()?;
    if max_occurrences == 0 {
        return Err(CommCalError::InvalidRule(
            "safety cap must be positive".to_string(),
        ));
    }

    let Some(rule) = &event.recurrence else {
        let occurrence = Occurrence {
            event,
            start: event.start,
            end: shifted_end(event, &event.start),
        };
        return Ok(if occurrence.intersects(window) {
            vec![occurrence]
        } else {
            Vec::new()
        });
    };

    let mut occurrences = Vec::new();
    let mut generated: usize = 0;
    let mut capped = false;

    loop {
        if let Some(count) = rule.count {
            if generated >= count as usize {
                break;
            }
        }
        if generated >= max_occurrences {
            capped = true;
            break;
        }

        // Candidate k is derived from the original start, not the previous
        // candidate, so month-end clamping never accumulates.
        let Some(start) = nth_start(&event.start, rule.frequency, rule.interval, generated as u32)
        else {
            // Ran off the representable calendar range.
            break;
        };

        if let Some(until) = rule.until {
            if start.date_naive() > until {
                break;
            }
        }
        // Starts are strictly increasing, so nothing past the window end can
        // intersect it.
        if start.to_utc() > window.end {
            break;
        }

        generated += 1;
        let occurrence = Occurrence {
            event,
            start,
            end: shifted_end(event, &start),
        };
        if occurrence.intersects(window) {
            occurrences.push(occurrence);
        }
    }

    if capped {
        warn!(
            event_id = %event.id,
            cap = max_occurrences,
            "expansion truncated by safety cap"
        );
    }
    debug!(
        event_id = %event.id,
        candidates = generated,
        returned = occurrences.len(),
        "expanded event"
    );

    Ok(occurrences)
}

/// The start of candidate `n` (0-based): the original start advanced by
/// `n * interval` units of `frequency`.
fn nth_start(origin: &EventTime, frequency: Frequency, interval: u32, n: u32) -> Option<EventTime> {
    let steps = interval.checked_mul(n)?;
    match origin {
        EventTime::Date(d) => shift_date(*d, frequency, steps).map(EventTime::Date),
        EventTime::DateTime(dt) => shift_date(dt.date_naive(), frequency, steps)
            .map(|d| EventTime::DateTime(d.and_time(dt.time()).and_utc())),
    }
}

/// Advance a date by `steps` units of `frequency`. Month and year steps use
/// chrono's calendar arithmetic, which clamps the day-of-month to the last
/// valid day of the target month (Jan 31 + 1 month = Feb 28/29, Feb 29 + 12
/// months = Feb 28 in non-leap years).
fn shift_date(date: NaiveDate, frequency: Frequency, steps: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(steps as u64)),
        Frequency::Weekly => date.checked_add_days(Days::new(steps as u64 * 7)),
        Frequency::Monthly => date.checked_add_months(Months::new(steps)),
        Frequency::Yearly => date.checked_add_months(Months::new(steps.checked_mul(12)?)),
    }
}

/// The end of an occurrence starting at `candidate_start`: the original
/// duration carried over, or the start itself for point-in-time events.
fn shifted_end(event: &Event, candidate_start: &EventTime) -> EventTime {
    let Some(end) = &event.end else {
        return *candidate_start;
    };
    match (&event.start, end, candidate_start) {
        (EventTime::Date(s0), EventTime::Date(e0), EventTime::Date(s)) => {
            EventTime::Date(*s + (*e0 - *s0))
        }
        (EventTime::DateTime(s0), EventTime::DateTime(e0), EventTime::DateTime(s)) => {
            EventTime::DateTime(*s + (*e0 - *s0))
        }
        // Mixed kinds are rejected by Event::validate before we get here.
        _ => *candidate_start,
    }
}
