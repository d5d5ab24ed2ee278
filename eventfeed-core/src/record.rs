//! Output event records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::CalendarEvent;
use crate::tagger::TagSet;

/// Workflow status given to every imported event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Approved,
    /// Never produced here; present so feeds edited by the review workflow still deserialize
    Pending,
    Rejected,
}

/// One event as written to the JSON feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Fresh per conversion run, never derived from the calendar UID
    pub event_id: String,
    pub summary: String,
    /// Sectioned HTML produced by the description formatter
    pub description: String,
    pub dtstart: String,
    pub dtend: String,
    pub location: String,
    /// Image URL, or empty when no image was found
    pub image: String,
    pub tags: Vec<String>,
    pub status: RecordStatus,
    pub attendees: Vec<String>,
    pub rsvps: Vec<String>,
    pub created_at: String,
}

impl EventRecord {
    pub fn assemble(
        event: &CalendarEvent,
        tags: &TagSet,
        description: String,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        EventRecord {
            event_id: Uuid::new_v4().to_string(),
            summary: event.summary.clone().unwrap_or_default(),
            description,
            dtstart: event.start.to_iso8601(),
            dtend: event.end.to_iso8601(),
            location: event.location.clone().unwrap_or_default(),
            image: image.unwrap_or_default(),
            tags: tags.to_strings(),
            status: RecordStatus::default(),
            attendees: Vec::new(),
            rsvps: Vec::new(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
