//! Error types for eventfeed.

use thiserror::Error;

/// Errors that can occur while converting a calendar.
#[derive(Error, Debug)]
pub enum EventfeedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Image lookup error: {0}")]
    ImageLookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventfeedError {
    fn from(err: serde_json::Error) -> Self {
        EventfeedError::Serialization(err.to_string())
    }
}

/// Result type alias for eventfeed operations.
pub type EventfeedResult<T> = Result<T, EventfeedError>;
