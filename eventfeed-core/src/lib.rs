//! Core types and pipeline for eventfeed.
//!
//! This crate turns a calendar (.ics) file into a list of JSON-ready event records:
//! - `ics` parses VEVENTs into `CalendarEvent`s
//! - `tagger` and `description` derive tags and formatted markup from event text
//! - `image` looks up a representative picture for each event
//! - `record` assembles the output records and `output` writes them
//! - `convert` wires everything together

pub mod config;
pub mod convert;
pub mod description;
pub mod error;
pub mod event;
pub mod ics;
pub mod image;
pub mod output;
pub mod record;
pub mod tagger;

pub use convert::Converter;
pub use error::{EventfeedError, EventfeedResult};
pub use event::{CalendarEvent, EventTime};
pub use record::EventRecord;
