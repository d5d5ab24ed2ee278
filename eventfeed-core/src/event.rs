//! Parsed calendar events.
//!
//! A `CalendarEvent` holds only the VEVENT fields the converter reads. Times keep
//! whatever precision and timezone the .ics file used until they're rendered.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// A VEVENT as read from the source calendar
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    /// Summary and description joined with a space, the text tags are derived from.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {}",
            self.summary.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// `20250320T150000Z`
    DateTimeUtc(DateTime<Utc>),
    /// No timezone information at all
    DateTimeFloating(NaiveDateTime),
    /// Local time in a named zone (`TZID=Europe/Helsinki`)
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    /// Render as an ISO-8601 string.
    ///
    /// Dates stay date-only, UTC times carry `+00:00`, zoned times carry the
    /// zone's offset at that instant. Floating times (and zoned times whose
    /// TZID chrono-tz doesn't know) are written without an offset.
    pub fn to_iso8601(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
            EventTime::DateTimeUtc(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
            EventTime::DateTimeFloating(dt) => format_naive(dt),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let Ok(tz) = tzid.parse::<Tz>() else {
                    return format_naive(datetime);
                };
                match tz.from_local_datetime(datetime).earliest() {
                    Some(local) => local
                        .fixed_offset()
                        .to_rfc3339_opts(SecondsFormat::Secs, false),
                    None => format_naive(datetime),
                }
            }
        }
    }
}

fn format_naive(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
