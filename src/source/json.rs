//! JSON-file-backed recording source.
//!
//! Recordings are a single JSON object with one group per channel and an
//! optional `pin` identity attribute:
//!
//! ```json
//! {
//!   "pin": "4711",
//!   "acceleration": { "t": [...], "x": [...], "y": [...], "z": [...] },
//!   "heart_rate":   { "t": [...], "heart_rate": [...] },
//!   "step_count":   { "t": [...], "steps": [...] }
//! }
//! ```
//!
//! A missing group means the channel is absent. A group whose arrays are
//! missing, empty, length-mismatched or non-finite is declared-but-empty,
//! which downstream treats as corruption.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::source::types::{
    AccelerationSeries, ChannelState, HeartRateSeries, IdentityValue, StepSeries,
};
use crate::source::RecordingSource;

/// Errors opening or parsing a recording file.
#[derive(Debug)]
pub enum SourceError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "IO error: {e}"),
            SourceError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}

#[derive(Debug, Deserialize)]
struct RecordingFile {
    pin: Option<serde_json::Value>,
    acceleration: Option<AccelerationGroup>,
    heart_rate: Option<HeartRateGroup>,
    step_count: Option<StepGroup>,
}

#[derive(Debug, Deserialize)]
struct AccelerationGroup {
    t: Option<Vec<f64>>,
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
    z: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct HeartRateGroup {
    t: Option<Vec<f64>>,
    heart_rate: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct StepGroup {
    t: Option<Vec<f64>>,
    steps: Option<Vec<f64>>,
}

/// A recording loaded from a JSON file.
pub struct JsonRecordingSource {
    path: PathBuf,
    file: RecordingFile,
}

impl JsonRecordingSource {
    /// Load a recording from disk. The file handle is released before this
    /// returns; processing works entirely from memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let content =
            std::fs::read_to_string(&path).map_err(|e| SourceError::Io(e.to_string()))?;
        let file: RecordingFile =
            serde_json::from_str(&content).map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Self { path, file })
    }
}

impl RecordingSource for JsonRecordingSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn identity(&self) -> IdentityValue {
        match &self.file.pin {
            None => IdentityValue::Missing,
            Some(serde_json::Value::String(s)) => IdentityValue::Text(s.clone()),
            Some(serde_json::Value::Bool(b)) => IdentityValue::Boolean(*b),
            Some(serde_json::Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    IdentityValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    IdentityValue::Float(f)
                } else {
                    IdentityValue::Unsupported
                }
            }
            Some(_) => IdentityValue::Unsupported,
        }
    }

    fn acceleration(&self) -> ChannelState<AccelerationSeries> {
        let group = match &self.file.acceleration {
            Some(group) => group,
            None => return ChannelState::Absent,
        };

        match (&group.t, &group.x, &group.y, &group.z) {
            (Some(t), Some(x), Some(y), Some(z))
                if usable(t) && aligned(t, x) && aligned(t, y) && aligned(t, z) =>
            {
                ChannelState::Present(AccelerationSeries {
                    t: t.clone(),
                    x: x.clone(),
                    y: y.clone(),
                    z: z.clone(),
                })
            }
            _ => ChannelState::Empty,
        }
    }

    fn heart_rate(&self) -> ChannelState<HeartRateSeries> {
        let group = match &self.file.heart_rate {
            Some(group) => group,
            None => return ChannelState::Absent,
        };

        match (&group.t, &group.heart_rate) {
            (Some(t), Some(bpm)) if usable(t) && aligned(t, bpm) => {
                ChannelState::Present(HeartRateSeries {
                    t: t.clone(),
                    bpm: bpm.clone(),
                })
            }
            _ => ChannelState::Empty,
        }
    }

    fn step_count(&self) -> ChannelState<StepSeries> {
        let group = match &self.file.step_count {
            Some(group) => group,
            None => return ChannelState::Absent,
        };

        let t = match &group.t {
            Some(t) if usable(t) => t.clone(),
            _ => return ChannelState::Empty,
        };

        // The counter array is optional at this layer; event-mode
        // recordings carry timestamps only. Cumulative mode enforces its
        // presence in the pipeline.
        match &group.steps {
            Some(steps) if !aligned(&t, steps) => ChannelState::Empty,
            Some(steps) => ChannelState::Present(StepSeries {
                t,
                counts: Some(steps.clone()),
            }),
            None => ChannelState::Present(StepSeries { t, counts: None }),
        }
    }
}

/// Non-empty and all-finite: anything else makes bucket math meaningless.
fn usable(timestamps: &[f64]) -> bool {
    !timestamps.is_empty() && timestamps.iter().all(|t| t.is_finite())
}

/// Value array matching its timestamp array in length, with finite values.
fn aligned(timestamps: &[f64], values: &[f64]) -> bool {
    timestamps.len() == values.len() && values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_from(json: &str) -> JsonRecordingSource {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        JsonRecordingSource::open(file.path()).unwrap()
    }

    #[test]
    fn test_missing_group_is_absent() {
        let source = source_from(r#"{"acceleration": {"t": [1.0], "x": [0.1], "y": [0.2], "z": [0.3]}}"#);
        assert!(matches!(source.heart_rate(), ChannelState::Absent));
        assert!(matches!(source.step_count(), ChannelState::Absent));
    }

    #[test]
    fn test_group_without_arrays_is_empty() {
        let source = source_from(r#"{"heart_rate": {}}"#);
        assert!(matches!(source.heart_rate(), ChannelState::Empty));
    }

    #[test]
    fn test_length_mismatch_is_empty() {
        let source = source_from(r#"{"heart_rate": {"t": [1.0, 2.0], "heart_rate": [70.0]}}"#);
        assert!(matches!(source.heart_rate(), ChannelState::Empty));
    }

    #[test]
    fn test_present_acceleration_round_trips() {
        let source = source_from(
            r#"{"acceleration": {"t": [1.0, 2.0], "x": [0.1, 0.2], "y": [0.3, 0.4], "z": [0.5, 0.6]}}"#,
        );
        match source.acceleration() {
            ChannelState::Present(series) => {
                assert_eq!(series.t, vec![1.0, 2.0]);
                assert_eq!(series.z, vec![0.5, 0.6]);
            }
            other => panic!("expected present acceleration, got {other:?}"),
        }
    }

    #[test]
    fn test_step_group_without_counter_is_event_series() {
        let source = source_from(r#"{"step_count": {"t": [1.0, 2.0, 3.0]}}"#);
        match source.step_count() {
            ChannelState::Present(series) => {
                assert_eq!(series.t.len(), 3);
                assert!(series.counts.is_none());
            }
            other => panic!("expected present steps, got {other:?}"),
        }
    }

    #[test]
    fn test_identity_scalars() {
        let source = source_from(r#"{"pin": "4711"}"#);
        assert_eq!(source.identity(), IdentityValue::Text("4711".to_string()));

        let source = source_from(r#"{"pin": 42}"#);
        assert_eq!(source.identity(), IdentityValue::Integer(42));

        let source = source_from(r#"{}"#);
        assert_eq!(source.identity(), IdentityValue::Missing);

        let source = source_from(r#"{"pin": ["nested"]}"#);
        assert_eq!(source.identity(), IdentityValue::Unsupported);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = JsonRecordingSource::open("/nonexistent/recording.json");
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let result = JsonRecordingSource::open(file.path());
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }
}
