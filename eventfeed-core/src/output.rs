//! JSON output.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::EventfeedResult;
use crate::record::EventRecord;

/// Destination path meaning "write to stdout".
pub const STDOUT: &str = "-";

/// Render records as a JSON array indented with four spaces.
pub fn to_json(records: &[EventRecord]) -> EventfeedResult<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_records<W: Write>(mut writer: W, records: &[EventRecord]) -> EventfeedResult<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut writer, formatter);
    records.serialize(&mut ser)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write records to `destination`, replacing any existing file. `-` writes to stdout.
pub fn write_json(destination: &Path, records: &[EventRecord]) -> EventfeedResult<()> {
    if destination.as_os_str() == STDOUT {
        let stdout = std::io::stdout();
        return write_records(stdout.lock(), records);
    }

    let json = to_json(records)?;
    std::fs::write(destination, json)?;
    Ok(())
}

/// Read a feed written by `write_json`.
pub fn read_json(source: &Path) -> EventfeedResult<Vec<EventRecord>> {
    let content = std::fs::read_to_string(source)?;
    Ok(serde_json::from_str(&content)?)
}
