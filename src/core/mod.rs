//! Core resampling engine.
//!
//! This module contains:
//! - Canonical minute grid derivation from the reference channel
//! - Per-channel aggregation onto bucket indices
//! - Alignment of every channel onto the one grid
//! - Assembly of the final minute-level record

pub mod align;
pub mod grid;
pub mod record;
pub mod resample;

// Re-export commonly used types
pub use align::{absent_series, align_counts, align_mean, AlignedChannels};
pub use grid::{bucket_index, TimeGrid, DEFAULT_INTERVAL};
pub use record::{
    assemble, representative_hour, representative_hour_compact, resolve_identity,
    AccelerationCell, Metadata, Record, Row, Units, DEVICE_DESCRIPTOR, INVALID_IDENTITY,
};
pub use resample::{count_events, mean_by_bucket, sum_counter_increments};
