//! Recording sources for the resampler.
//!
//! A source hands the pipeline each channel's raw samples together with an
//! explicit presence tri-state, plus the recording's identity attribute.
//! Container mechanics stay behind the `RecordingSource` trait so the core
//! never touches file formats.

pub mod json;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use json::{JsonRecordingSource, SourceError};
pub use memory::MemoryRecordingSource;
pub use types::{
    AccelerationSeries, ChannelState, HeartRateSeries, IdentityValue, Sample, StepSeries,
};

/// One complete recording, viewed channel by channel.
///
/// Presence is decided once, at ingestion, and returned as an ordinary
/// value; the pipeline never re-derives it from paths or group names.
pub trait RecordingSource {
    /// Human-readable identifier for error messages, typically a file path.
    fn describe(&self) -> String;

    /// The recording's identity attribute, as found.
    fn identity(&self) -> IdentityValue;

    /// Acceleration channel (the grid reference; required downstream).
    fn acceleration(&self) -> ChannelState<AccelerationSeries>;

    /// Heart rate channel (optional).
    fn heart_rate(&self) -> ChannelState<HeartRateSeries>;

    /// Step count channel (optional).
    fn step_count(&self) -> ChannelState<StepSeries>;
}
