//! ICS file parsing.
//!
//! Reads .ics content according to RFC 5545 and extracts the VEVENT fields the
//! converter needs.

mod parse;

pub use parse::parse_calendar;
