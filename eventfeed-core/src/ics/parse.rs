//! ICS parsing using the icalendar crate's parser.

use crate::error::{EventfeedError, EventfeedResult};
use crate::event::{CalendarEvent, EventTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

/// Parse every VEVENT in a calendar, in file order.
///
/// Any malformed calendar or event is an error; no partial result is returned.
pub fn parse_calendar(content: &str) -> EventfeedResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| EventfeedError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .enumerate()
        .map(|(index, vevent)| parse_vevent(index, vevent))
        .collect()
}

fn parse_vevent(index: usize, vevent: &Component) -> EventfeedResult<CalendarEvent> {
    let summary = text_prop(vevent, "SUMMARY");
    let description = text_prop(vevent, "DESCRIPTION");
    let location = text_prop(vevent, "LOCATION");

    let label = summary
        .clone()
        .unwrap_or_else(|| format!("#{}", index + 1));

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .ok_or_else(|| {
            EventfeedError::IcsParse(format!("Event {label} has no valid DTSTART"))
        })?;

    // DTEND is optional: fall back to DURATION, then to a zero-length event
    let end = match vevent.find_prop("DTEND") {
        Some(p) => DatePerhapsTime::try_from(p).map(to_event_time).map_err(|_| {
            EventfeedError::IcsParse(format!("Event {label} has an invalid DTEND"))
        })?,
        None => match vevent.find_prop("DURATION") {
            Some(p) => {
                let raw: &str = p.val.as_ref();
                add_duration(&start, raw).ok_or_else(|| {
                    EventfeedError::IcsParse(format!("Event {label} has an invalid DURATION: {raw}"))
                })?
            }
            None => start.clone(),
        },
    };

    Ok(CalendarEvent {
        summary,
        description,
        location,
        start,
        end,
    })
}

fn text_prop(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

/// Apply an RFC 5545 DURATION value (`PT2H`, `P1D`, ...) to a start time.
fn add_duration(start: &EventTime, value: &str) -> Option<EventTime> {
    let duration = iso8601::duration(value.trim_start_matches('+')).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let delta = chrono::Duration::from_std(std_duration).ok()?;

    Some(match start {
        EventTime::Date(d) => EventTime::Date(*d + chrono::Duration::days(delta.num_days())),
        EventTime::DateTimeUtc(dt) => EventTime::DateTimeUtc(*dt + delta),
        EventTime::DateTimeFloating(dt) => EventTime::DateTimeFloating(*dt + delta),
        EventTime::DateTimeZoned { datetime, tzid } => EventTime::DateTimeZoned {
            datetime: *datetime + delta,
            tzid: tzid.clone(),
        },
    })
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
