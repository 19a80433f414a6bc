//! Batch pipeline: one recording in, one minute-level record out.
//!
//! The pipeline runs synchronously and touches each stage once: derive the
//! grid from the acceleration channel, aggregate every channel onto it,
//! align, assemble and deliver. A failure at any stage propagates
//! immediately; nothing is retried and nothing partial is written.

use std::time::Duration;

use crate::config::StepMode;
use crate::core::{
    absent_series, align_counts, align_mean, assemble, count_events, mean_by_bucket,
    representative_hour, resolve_identity, sum_counter_increments, AlignedChannels, TimeGrid,
    DEFAULT_INTERVAL,
};
use crate::output::{RecordSink, SinkError};
use crate::source::{ChannelState, RecordingSource, StepSeries};

/// Per-run pipeline options.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Width of each aggregation bucket
    pub interval: Duration,
    /// How step samples are aggregated
    pub step_mode: StepMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            step_mode: StepMode::Cumulative,
        }
    }
}

/// Fatal pipeline errors.
///
/// Identity problems are not listed here: a missing or non-scalar identity
/// recovers locally through the sentinel and never fails a run.
#[derive(Debug)]
pub enum ProcessError {
    /// The acceleration channel, which defines the grid, is missing or
    /// declared-but-empty
    MissingRequiredChannel { source: String },
    /// An optional channel's group exists but its data arrays are missing
    MissingOptionalChannelData { channel: String, source: String },
    /// Writing the output record failed
    Sink(SinkError),
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::MissingRequiredChannel { source } => {
                write!(
                    f,
                    "incomplete recording {source}: acceleration channel is missing or empty"
                )
            }
            ProcessError::MissingOptionalChannelData { channel, source } => {
                write!(
                    f,
                    "incomplete recording {source}: {channel} group is declared but its data is missing"
                )
            }
            ProcessError::Sink(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<SinkError> for ProcessError {
    fn from(e: SinkError) -> Self {
        ProcessError::Sink(e)
    }
}

/// What the caller needs to report a completed run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Resolved identity embedded in the record
    pub identity: String,
    /// First bucket floored to the hour, ISO-8601 UTC
    pub timestamp: String,
    /// Destination descriptor returned by the sink
    pub output: String,
}

/// Process one recording into one delivered record.
pub fn process(
    source: &impl RecordingSource,
    sink: &mut impl RecordSink,
    options: &PipelineOptions,
) -> Result<ProcessOutcome, ProcessError> {
    let accel = match source.acceleration() {
        ChannelState::Present(series) => series,
        ChannelState::Empty | ChannelState::Absent => {
            return Err(ProcessError::MissingRequiredChannel {
                source: source.describe(),
            })
        }
    };

    let grid = TimeGrid::from_reference(&accel.t, options.interval).ok_or_else(|| {
        ProcessError::MissingRequiredChannel {
            source: source.describe(),
        }
    })?;
    let interval_ms = grid.interval_ms();

    let accel_x = align_mean(
        &grid,
        &mean_by_bucket(accel.axis_samples(&accel.x), interval_ms),
    );
    let accel_y = align_mean(
        &grid,
        &mean_by_bucket(accel.axis_samples(&accel.y), interval_ms),
    );
    let accel_z = align_mean(
        &grid,
        &mean_by_bucket(accel.axis_samples(&accel.z), interval_ms),
    );

    let heart_rate = match source.heart_rate() {
        ChannelState::Present(series) => {
            align_mean(&grid, &mean_by_bucket(series.samples(), interval_ms))
        }
        ChannelState::Absent => absent_series(&grid),
        ChannelState::Empty => {
            return Err(ProcessError::MissingOptionalChannelData {
                channel: "heart rate".to_string(),
                source: source.describe(),
            })
        }
    };

    let step_count = match source.step_count() {
        ChannelState::Present(series) => {
            let aggregated = aggregate_steps(&series, options.step_mode, interval_ms)
                .ok_or_else(|| ProcessError::MissingOptionalChannelData {
                    channel: "step count".to_string(),
                    source: source.describe(),
                })?;
            align_counts(&grid, &aggregated)
        }
        ChannelState::Absent => absent_series(&grid),
        ChannelState::Empty => {
            return Err(ProcessError::MissingOptionalChannelData {
                channel: "step count".to_string(),
                source: source.describe(),
            })
        }
    };

    let channels = AlignedChannels {
        accel_x,
        accel_y,
        accel_z,
        heart_rate,
        step_count,
    };

    let identity = resolve_identity(&source.identity());
    let record = assemble(&identity, &grid, &channels);
    let timestamp = representative_hour(&grid);

    let output = sink.write(&record)?;

    Ok(ProcessOutcome {
        identity,
        timestamp,
        output,
    })
}

/// Aggregate the step channel per the configured mode.
///
/// Returns `None` when cumulative mode is requested but the recording
/// carries no counter array; callers treat that as declared-but-empty.
fn aggregate_steps(
    series: &StepSeries,
    mode: StepMode,
    interval_ms: i64,
) -> Option<std::collections::BTreeMap<i64, f64>> {
    match mode {
        StepMode::Cumulative => series
            .counter_samples()
            .map(|samples| sum_counter_increments(samples, interval_ms)),
        StepMode::Events => Some(count_events(&series.t, interval_ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use crate::source::{AccelerationSeries, IdentityValue, MemoryRecordingSource};

    /// Sink that keeps the record in memory.
    struct CaptureSink {
        last: Option<Record>,
    }

    impl RecordSink for CaptureSink {
        fn write(&mut self, record: &Record) -> Result<String, SinkError> {
            self.last = Some(record.clone());
            Ok("captured".to_string())
        }
    }

    fn accel_two_minutes() -> AccelerationSeries {
        AccelerationSeries {
            t: vec![0.0, 30.0, 61.0, 90.0],
            x: vec![10.0, 20.0, 40.0, 60.0],
            y: vec![1.0, 1.0, 2.0, 2.0],
            z: vec![0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_missing_acceleration_is_fatal() {
        let source = MemoryRecordingSource::new("unit", IdentityValue::Missing);
        let mut sink = CaptureSink { last: None };

        let result = process(&source, &mut sink, &PipelineOptions::default());
        assert!(matches!(
            result,
            Err(ProcessError::MissingRequiredChannel { .. })
        ));
        assert!(sink.last.is_none());
    }

    #[test]
    fn test_empty_heart_rate_group_is_fatal() {
        let source = MemoryRecordingSource::new("unit", IdentityValue::Missing)
            .with_acceleration(ChannelState::Present(accel_two_minutes()))
            .with_heart_rate(ChannelState::Empty);
        let mut sink = CaptureSink { last: None };

        let result = process(&source, &mut sink, &PipelineOptions::default());
        match result {
            Err(ProcessError::MissingOptionalChannelData { channel, .. }) => {
                assert_eq!(channel, "heart rate");
            }
            other => panic!("expected missing optional channel data, got {other:?}"),
        }
    }

    #[test]
    fn test_acceleration_means_per_bucket() {
        let source = MemoryRecordingSource::new("unit", IdentityValue::Text("4711".into()))
            .with_acceleration(ChannelState::Present(accel_two_minutes()));
        let mut sink = CaptureSink { last: None };

        process(&source, &mut sink, &PipelineOptions::default()).unwrap();
        let record = sink.last.unwrap();

        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data[0].acceleration.x, Some(15.0));
        assert_eq!(record.data[1].acceleration.x, Some(50.0));
    }

    #[test]
    fn test_cumulative_mode_without_counter_is_fatal() {
        let steps = StepSeries {
            t: vec![5.0, 15.0],
            counts: None,
        };
        let source = MemoryRecordingSource::new("unit", IdentityValue::Missing)
            .with_acceleration(ChannelState::Present(accel_two_minutes()))
            .with_step_count(ChannelState::Present(steps));
        let mut sink = CaptureSink { last: None };

        let result = process(&source, &mut sink, &PipelineOptions::default());
        assert!(matches!(
            result,
            Err(ProcessError::MissingOptionalChannelData { .. })
        ));
    }

    #[test]
    fn test_event_mode_counts_timestamps() {
        let steps = StepSeries {
            t: vec![5.0, 15.0, 75.0],
            counts: None,
        };
        let source = MemoryRecordingSource::new("unit", IdentityValue::Missing)
            .with_acceleration(ChannelState::Present(accel_two_minutes()))
            .with_step_count(ChannelState::Present(steps));
        let mut sink = CaptureSink { last: None };
        let options = PipelineOptions {
            step_mode: StepMode::Events,
            ..PipelineOptions::default()
        };

        process(&source, &mut sink, &options).unwrap();
        let record = sink.last.unwrap();

        assert_eq!(record.data[0].step_count, Some(2));
        assert_eq!(record.data[1].step_count, Some(1));
    }

    #[test]
    fn test_outcome_reports_identity_and_hour() {
        let accel = AccelerationSeries {
            t: vec![1709301900.0, 1709301930.0],
            x: vec![0.0, 0.0],
            y: vec![0.0, 0.0],
            z: vec![0.0, 0.0],
        };
        let source = MemoryRecordingSource::new("unit", IdentityValue::Integer(4711))
            .with_acceleration(ChannelState::Present(accel));
        let mut sink = CaptureSink { last: None };

        let outcome = process(&source, &mut sink, &PipelineOptions::default()).unwrap();
        assert_eq!(outcome.identity, "4711");
        assert_eq!(outcome.timestamp, "2024-03-01T14:00:00Z");
        assert_eq!(outcome.output, "captured");
    }
}
