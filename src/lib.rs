//! Watch Resampler - minute-level resampler for wearable sensor recordings.
//!
//! This library converts one recording of irregularly-sampled acceleration,
//! heart rate and step count samples into a fixed-interval, time-aligned,
//! JSON-serializable record.
//!
//! # Semantics
//!
//! - The acceleration channel is the reference: its observed timespan
//!   defines one contiguous grid of minute buckets, with no gaps.
//! - Continuous channels (acceleration axes, heart rate) aggregate by mean;
//!   a bucket nobody sampled is null, never zero.
//! - The step channel aggregates by counting; a bucket with no steps is a
//!   real zero as long as the channel exists, and null on every row when
//!   the channel is absent from the recording.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Watch Resampler                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │  Source  │──▶│   Grid   │──▶│ Resample │──▶│  Align   │  │
//! │  │ (JSON)   │   │ (1 min)  │   │ (per ch) │   │ (merge)  │  │
//! │  └──────────┘   └──────────┘   └──────────┘   └──────────┘  │
//! │                                                    │         │
//! │                                                    ▼         │
//! │                              ┌──────────┐   ┌──────────┐    │
//! │                              │   Sink   │◀──│ Assemble │    │
//! │                              │ (file)   │   │ (record) │    │
//! │                              └──────────┘   └──────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use watch_resampler::{process, JsonFileSink, JsonRecordingSource, PipelineOptions};
//!
//! let source = JsonRecordingSource::open("recording.json").expect("readable recording");
//! let mut sink = JsonFileSink::new("out/record.json", true);
//!
//! let outcome = process(&source, &mut sink, &PipelineOptions::default())
//!     .expect("complete recording");
//! println!("{} -> {}", outcome.identity, outcome.output);
//! ```

pub mod config;
pub mod core;
pub mod output;
pub mod pipeline;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, StepMode};
pub use core::{Record, Row, TimeGrid, DEFAULT_INTERVAL, DEVICE_DESCRIPTOR, INVALID_IDENTITY};
pub use output::{JsonFileSink, RecordSink, SinkError};
pub use pipeline::{process, PipelineOptions, ProcessError, ProcessOutcome};
pub use source::{
    ChannelState, IdentityValue, JsonRecordingSource, MemoryRecordingSource, RecordingSource,
    Sample, SourceError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
