//! In-memory recording source.
//!
//! Used by tests and by embedders that already hold channel arrays and do
//! not want to round-trip through a file.

use crate::source::types::{
    AccelerationSeries, ChannelState, HeartRateSeries, IdentityValue, StepSeries,
};
use crate::source::RecordingSource;

/// A recording assembled directly from channel states.
#[derive(Debug, Clone)]
pub struct MemoryRecordingSource {
    label: String,
    identity: IdentityValue,
    acceleration: ChannelState<AccelerationSeries>,
    heart_rate: ChannelState<HeartRateSeries>,
    step_count: ChannelState<StepSeries>,
}

impl MemoryRecordingSource {
    /// Start from an identity; channels default to absent.
    pub fn new(label: impl Into<String>, identity: IdentityValue) -> Self {
        Self {
            label: label.into(),
            identity,
            acceleration: ChannelState::Absent,
            heart_rate: ChannelState::Absent,
            step_count: ChannelState::Absent,
        }
    }

    pub fn with_acceleration(mut self, state: ChannelState<AccelerationSeries>) -> Self {
        self.acceleration = state;
        self
    }

    pub fn with_heart_rate(mut self, state: ChannelState<HeartRateSeries>) -> Self {
        self.heart_rate = state;
        self
    }

    pub fn with_step_count(mut self, state: ChannelState<StepSeries>) -> Self {
        self.step_count = state;
        self
    }
}

impl RecordingSource for MemoryRecordingSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn identity(&self) -> IdentityValue {
        self.identity.clone()
    }

    fn acceleration(&self) -> ChannelState<AccelerationSeries> {
        self.acceleration.clone()
    }

    fn heart_rate(&self) -> ChannelState<HeartRateSeries> {
        self.heart_rate.clone()
    }

    fn step_count(&self) -> ChannelState<StepSeries> {
        self.step_count.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_default_to_absent() {
        let source = MemoryRecordingSource::new("unit", IdentityValue::Missing);
        assert!(matches!(source.acceleration(), ChannelState::Absent));
        assert!(matches!(source.heart_rate(), ChannelState::Absent));
        assert!(matches!(source.step_count(), ChannelState::Absent));
    }

    #[test]
    fn test_builder_sets_channels() {
        let series = AccelerationSeries {
            t: vec![0.0],
            x: vec![1.0],
            y: vec![2.0],
            z: vec![3.0],
        };
        let source = MemoryRecordingSource::new("unit", IdentityValue::Integer(7))
            .with_acceleration(ChannelState::Present(series));

        assert!(source.acceleration().is_present());
        assert_eq!(source.identity(), IdentityValue::Integer(7));
    }
}
