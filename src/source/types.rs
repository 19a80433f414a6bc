//! Channel data types for wearable recordings.
//!
//! A recording carries up to three channels (acceleration, heart rate,
//! step count), each an ordered sequence of timestamped samples. Presence
//! is an explicit tri-state decided once at ingestion, never re-inferred.

use serde::{Deserialize, Serialize};

/// A single timestamped sensor sample.
///
/// Timestamps are seconds since the Unix epoch. Within a channel they are
/// non-decreasing but need not be strictly increasing or evenly spaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    /// Measured value at that instant
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Presence tri-state for a channel.
///
/// `Empty` means the channel group exists in the recording but its data
/// arrays are missing or unusable; that indicates upstream corruption and
/// is handled differently from a channel that does not exist at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelState<T> {
    /// Channel group exists and carries usable samples
    Present(T),
    /// Channel group exists but its arrays are missing or unusable
    Empty,
    /// Channel group does not exist in the recording
    Absent,
}

impl<T> ChannelState<T> {
    /// True if the channel carries usable data.
    pub fn is_present(&self) -> bool {
        matches!(self, ChannelState::Present(_))
    }
}

/// Tri-axis acceleration samples sharing one timestamp array.
///
/// All four arrays have equal length; sources must reject mismatched
/// lengths at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSeries {
    /// Seconds since the Unix epoch, one per sample
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl AccelerationSeries {
    /// Samples for one axis, zipped with the shared timestamps.
    pub fn axis_samples<'a>(
        &'a self,
        axis: &'a [f64],
    ) -> impl Iterator<Item = Sample> + 'a {
        self.t
            .iter()
            .zip(axis.iter())
            .map(|(&t, &v)| Sample::new(t, v))
    }
}

/// Heart rate samples in beats per minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSeries {
    /// Seconds since the Unix epoch, one per sample
    pub t: Vec<f64>,
    /// Beats per minute, one per timestamp
    pub bpm: Vec<f64>,
}

impl HeartRateSeries {
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.t
            .iter()
            .zip(self.bpm.iter())
            .map(|(&t, &v)| Sample::new(t, v))
    }
}

/// Step samples: raw detection timestamps, optionally paired with a
/// cumulative counter value per timestamp.
///
/// In event mode each timestamp is one detected step and `counts` is
/// ignored. In cumulative mode `counts` is the running counter and must be
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSeries {
    /// Seconds since the Unix epoch, one per sample
    pub t: Vec<f64>,
    /// Cumulative step counter, one per timestamp (cumulative mode only)
    pub counts: Option<Vec<f64>>,
}

impl StepSeries {
    /// Cumulative counter samples, if the recording carries the counter.
    pub fn counter_samples(&self) -> Option<impl Iterator<Item = Sample> + '_> {
        self.counts.as_ref().map(|counts| {
            self.t
                .iter()
                .zip(counts.iter())
                .map(|(&t, &v)| Sample::new(t, v))
        })
    }
}

/// Raw identity attribute as read from the recording.
///
/// Only primitive scalars resolve to a usable identity string; everything
/// else is substituted with a sentinel downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Byte-string attribute, as some containers store identities
    Bytes(Vec<u8>),
    /// Attribute not present on the recording
    Missing,
    /// Attribute present but not a primitive scalar
    Unsupported,
}
