//! Core types and computations for the commcal ecosystem.
//!
//! This crate provides everything the CLI (and any other caller) needs to
//! work with community-calendar events:
//! - `Event` and related types for calendar events
//! - `recurrence` for expanding recurring events into concrete occurrences
//! - `ics` for generating and parsing RFC 5545 calendar data
//!
//! The library is pure and synchronous: it performs no I/O, reads no clocks,
//! and holds no shared state, so it can be called concurrently from any
//! number of requests.

pub mod error;
pub mod event;
pub mod ics;
pub mod recurrence;
pub mod window;

pub use error::{CommCalError, CommCalResult};
pub use event::{Event, EventTime};
pub use recurrence::{DEFAULT_MAX_OCCURRENCES, Frequency, Occurrence, RecurrenceRule, expand};
pub use window::TimeWindow;
