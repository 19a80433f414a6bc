//! Final record assembly.
//!
//! Aligned cells are rounded, nested, null-normalized and timestamped here,
//! after aggregation. Every nullable cell serializes as an explicit JSON
//! null so consumers never see an omitted field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::align::AlignedChannels;
use crate::core::grid::TimeGrid;
use crate::source::IdentityValue;

/// Device descriptor embedded in every record.
pub const DEVICE_DESCRIPTOR: &str = "Pixel Watch";

/// Sentinel identity used when the recording carries no usable identity.
pub const INVALID_IDENTITY: &str = "InvalidPIN";

/// Measurement units block, stable across records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Units {
    #[serde(rename = "heartRate")]
    pub heart_rate: String,
    #[serde(rename = "stepCount")]
    pub step_count: String,
    pub acceleration: String,
}

/// Version and units metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub units: Units,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            units: Units {
                heart_rate: "bpm".to_string(),
                step_count: "count".to_string(),
                acceleration: "mg".to_string(),
            },
        }
    }
}

/// Per-row acceleration cell with independently nullable axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationCell {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// One output row per grid bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Bucket start as an ISO-8601 UTC instant with zero seconds
    pub timestamp: String,
    pub heart_rate: Option<i64>,
    pub step_count: Option<i64>,
    pub acceleration: AccelerationCell,
}

/// The complete minute-level record for one recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub pwid: String,
    pub device: String,
    pub metadata: Metadata,
    pub data: Vec<Row>,
}

/// Round to the nearest integer, halves up: 2.5 rounds to 3, 3.49 to 3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round an acceleration axis to two decimal places.
pub fn round_axis(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resolve the identity attribute to the string embedded in the record.
///
/// Only primitive scalars resolve; anything else substitutes the sentinel.
/// The substitution is deliberate recovery, never an error.
pub fn resolve_identity(value: &IdentityValue) -> String {
    match value {
        IdentityValue::Text(s) => s.clone(),
        IdentityValue::Integer(n) => n.to_string(),
        IdentityValue::Float(f) => f.to_string(),
        IdentityValue::Boolean(b) => b.to_string(),
        IdentityValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        IdentityValue::Missing | IdentityValue::Unsupported => INVALID_IDENTITY.to_string(),
    }
}

/// Assemble the output record from aligned channel cells.
///
/// Rows come out one-to-one with the grid, in grid order. Rounding happens
/// here, after aggregation.
pub fn assemble(identity: &str, grid: &TimeGrid, channels: &AlignedChannels) -> Record {
    let data = (0..grid.len())
        .map(|position| Row {
            timestamp: format_bucket(grid.bucket_start_ms(position)),
            heart_rate: channels.heart_rate[position].map(round_half_up),
            step_count: channels.step_count[position].map(round_half_up),
            acceleration: AccelerationCell {
                x: channels.accel_x[position].map(round_axis),
                y: channels.accel_y[position].map(round_axis),
                z: channels.accel_z[position].map(round_axis),
            },
        })
        .collect();

    Record {
        pwid: identity.to_string(),
        device: DEVICE_DESCRIPTOR.to_string(),
        metadata: Metadata::default(),
        data,
    }
}

/// Representative instant for the record: the first bucket floored to the
/// hour. Callers use it to place the output file.
pub fn representative_hour(grid: &TimeGrid) -> String {
    let instant = bucket_instant(grid.bucket_start_ms(0));
    format!("{}", instant.format("%Y-%m-%dT%H:00:00Z"))
}

/// Same instant in the compact form used for file names.
pub fn representative_hour_compact(grid: &TimeGrid) -> String {
    let instant = bucket_instant(grid.bucket_start_ms(0));
    format!("{}", instant.format("%Y%m%d-%H0000"))
}

fn format_bucket(epoch_ms: i64) -> String {
    format!("{}", bucket_instant(epoch_ms).format("%Y-%m-%dT%H:%M:%SZ"))
}

fn bucket_instant(epoch_ms: i64) -> DateTime<Utc> {
    // Bucket starts come from validated finite timestamps, so they are
    // always within chrono's representable range.
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .expect("bucket start within representable time range")
}
