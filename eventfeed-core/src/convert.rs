//! The calendar → JSON pipeline.

use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::description::DescriptionFormatter;
use crate::error::EventfeedResult;
use crate::event::CalendarEvent;
use crate::ics::parse_calendar;
use crate::image::{ImageSearch, image_query};
use crate::output::write_json;
use crate::record::EventRecord;
use crate::tagger::Tagger;

/// Converts calendar events into feed records, one event at a time.
pub struct Converter<S> {
    tagger: Tagger,
    formatter: DescriptionFormatter,
    images: S,
}

impl<S: ImageSearch> Converter<S> {
    pub fn new(tagger: Tagger, formatter: DescriptionFormatter, images: S) -> Self {
        Converter {
            tagger,
            formatter,
            images,
        }
    }

    /// Parse calendar text and convert every VEVENT, in file order.
    pub async fn convert(&self, ics: &str) -> EventfeedResult<Vec<EventRecord>> {
        let events = parse_calendar(ics)?;
        let mut records = Vec::with_capacity(events.len());

        for event in &events {
            records.push(self.convert_event(event).await);
        }

        Ok(records)
    }

    pub async fn convert_event(&self, event: &CalendarEvent) -> EventRecord {
        let summary = event.summary.as_deref().unwrap_or_default();
        let raw_description = event.description.as_deref().unwrap_or_default();

        let description = self.formatter.format(raw_description);
        let tags = self.tagger.tags(&event.searchable_text());
        let image = self.images.find_image(&image_query(&tags, summary)).await;

        let record = EventRecord::assemble(event, &tags, description, image, Utc::now());
        info!("Processed event: {} with tags: [{}]", record.summary, tags);
        record
    }

    /// Read `source`, convert it and write the feed to `destination`.
    ///
    /// Returns the number of records written.
    pub async fn convert_file(&self, source: &Path, destination: &Path) -> EventfeedResult<usize> {
        info!("Reading ICS file from: {}", source.display());
        let ics = std::fs::read_to_string(source)?;

        let records = self.convert(&ics).await?;
        write_json(destination, &records)?;

        info!("JSON file written to: {}", destination.display());
        Ok(records.len())
    }
}
