//! Record delivery.
//!
//! A sink receives one fully assembled record and returns a descriptor for
//! where it landed. The bundled file sink serializes the whole record
//! before touching the filesystem, so a failed run never leaves a partial
//! output file behind.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::core::Record;

/// Errors delivering a record.
#[derive(Debug)]
pub enum SinkError {
    Serialize(String),
    Io(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Serialize(e) => write!(f, "Serialize error: {e}"),
            SinkError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for SinkError {}

/// Destination for assembled records.
pub trait RecordSink {
    /// Deliver one record; returns a descriptor of the destination
    /// (for the file sink, the path written).
    fn write(&mut self, record: &Record) -> Result<String, SinkError>;
}

/// Writes records as JSON files.
///
/// The final file name is derived from the record itself:
/// `{identity}_{YYYYmmdd-HH0000}_{requested name}`, with the hour taken
/// from the record's first row, placed next to the requested path.
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    fn destination(&self, record: &Record) -> PathBuf {
        let prefix = record
            .data
            .first()
            .and_then(|row| hour_prefix(&row.timestamp));

        match (prefix, self.path.file_name()) {
            (Some(hour), Some(name)) => {
                let file_name = format!("{}_{}_{}", record.pwid, hour, name.to_string_lossy());
                self.path
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(file_name)
            }
            // No rows to take an hour from: fall back to the requested path.
            _ => self.path.clone(),
        }
    }
}

impl RecordSink for JsonFileSink {
    fn write(&mut self, record: &Record) -> Result<String, SinkError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(record)
        } else {
            serde_json::to_string(record)
        }
        .map_err(|e| SinkError::Serialize(e.to_string()))?;

        let destination = self.destination(record);
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SinkError::Io(e.to_string()))?;
            }
        }
        std::fs::write(&destination, json).map_err(|e| SinkError::Io(e.to_string()))?;

        Ok(destination.display().to_string())
    }
}

/// First-row instant floored to the hour, in compact file-name form.
fn hour_prefix(timestamp: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ").ok()?;
    Some(parsed.format("%Y%m%d-%H0000").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccelerationCell, Metadata, Row};

    fn record_with_row(timestamp: &str) -> Record {
        Record {
            pwid: "4711".to_string(),
            device: "Pixel Watch".to_string(),
            metadata: Metadata::default(),
            data: vec![Row {
                timestamp: timestamp.to_string(),
                heart_rate: Some(72),
                step_count: Some(0),
                acceleration: AccelerationCell {
                    x: Some(1.0),
                    y: None,
                    z: Some(-0.5),
                },
            }],
        }
    }

    #[test]
    fn test_hour_prefix() {
        assert_eq!(
            hour_prefix("2024-03-01T14:05:00Z"),
            Some("20240301-140000".to_string())
        );
        assert_eq!(hour_prefix("garbage"), None);
    }

    #[test]
    fn test_file_name_carries_identity_and_hour() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("out.json"), true);

        let path = sink.write(&record_with_row("2024-03-01T14:05:00Z")).unwrap();
        assert!(path.ends_with("4711_20240301-140000_out.json"));
        assert!(std::path::Path::new(&path).exists());
    }

    #[test]
    fn test_written_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("out.json"), false);

        let path = sink.write(&record_with_row("2024-03-01T14:05:00Z")).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["pwid"], "4711");
        assert_eq!(value["data"][0]["acceleration"]["y"], serde_json::Value::Null);
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        // A regular file in the directory position makes the destination
        // impossible to create.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let mut sink = JsonFileSink::new(blocker.path().join("sub").join("out.json"), true);

        let result = sink.write(&record_with_row("2024-03-01T14:05:00Z"));
        assert!(matches!(result, Err(SinkError::Io(_))));
    }
}
