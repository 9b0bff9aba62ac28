//! Calendar interchange (RFC 5545) generation and parsing.
//!
//! Generation goes through the `icalendar` crate, which owns text escaping
//! and 75-octet line folding; parsing is a small hand-rolled line parser so
//! exports can be verified (and imported) without trusting the generator.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::{ImportedEvent, parse_events};

/// Calendar-level metadata attached to an export.
#[derive(Debug, Clone)]
pub struct CalendarMetadata {
    /// Human-readable calendar name (X-WR-CALNAME).
    pub name: String,
}
