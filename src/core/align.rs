//! Reindexing of per-channel aggregates onto the canonical grid.
//!
//! The grid is the union index space: every channel's series is expressed
//! over exactly the grid's buckets. A channel that exists but did not cover
//! a bucket yields null for continuous signals and zero for counters; a
//! channel that does not exist at all yields null everywhere.

use std::collections::BTreeMap;

use crate::core::grid::TimeGrid;

/// Continuous-channel cells for each grid bucket, in grid order.
///
/// Buckets outside the channel's observed span stay `None`.
pub fn align_mean(grid: &TimeGrid, series: &BTreeMap<i64, f64>) -> Vec<Option<f64>> {
    let mut cells = vec![None; grid.len()];
    for (&bucket, &value) in series {
        if let Some(position) = grid.position(bucket) {
            cells[position] = Some(value);
        }
    }
    cells
}

/// Counting-channel cells for each grid bucket, in grid order.
///
/// The channel exists, so a bucket with no contributing samples is a real
/// zero, not an absence.
pub fn align_counts(grid: &TimeGrid, series: &BTreeMap<i64, f64>) -> Vec<Option<f64>> {
    let mut cells = vec![Some(0.0); grid.len()];
    for (&bucket, &value) in series {
        if let Some(position) = grid.position(bucket) {
            cells[position] = Some(value);
        }
    }
    cells
}

/// All-null cells for a channel that does not exist in the recording.
pub fn absent_series(grid: &TimeGrid) -> Vec<Option<f64>> {
    vec![None; grid.len()]
}

/// Every channel's cells, reindexed onto one grid.
#[derive(Debug, Clone)]
pub struct AlignedChannels {
    pub accel_x: Vec<Option<f64>>,
    pub accel_y: Vec<Option<f64>>,
    pub accel_z: Vec<Option<f64>>,
    pub heart_rate: Vec<Option<f64>>,
    pub step_count: Vec<Option<f64>>,
}
