//! Canonical minute grid derivation.
//!
//! The reference channel's observed timespan defines one contiguous grid of
//! fixed-width buckets. Every bucket between the first and last observed
//! bucket appears exactly once, including buckets no sample falls into.

use std::time::Duration;

/// Default bucket width.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Bucket index for a timestamp in seconds since the epoch.
///
/// Timestamps are converted to integer milliseconds before flooring so that
/// samples near a boundary cannot drift into the wrong bucket through
/// binary float imprecision.
pub fn bucket_index(timestamp_secs: f64, interval_ms: i64) -> i64 {
    let millis = (timestamp_secs * 1000.0).round() as i64;
    millis.div_euclid(interval_ms)
}

/// A contiguous sequence of fixed-width bucket start instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    interval_ms: i64,
    first_bucket: i64,
    len: usize,
}

impl TimeGrid {
    /// Build the grid spanning the reference channel's timestamps.
    ///
    /// Returns `None` when the timestamp sequence is empty; callers treat
    /// that the same as a missing reference channel.
    pub fn from_reference(timestamps: &[f64], interval: Duration) -> Option<Self> {
        let interval_ms = interval.as_millis() as i64;
        if interval_ms <= 0 || timestamps.is_empty() {
            return None;
        }

        let mut min_bucket = i64::MAX;
        let mut max_bucket = i64::MIN;
        for &t in timestamps {
            let bucket = bucket_index(t, interval_ms);
            min_bucket = min_bucket.min(bucket);
            max_bucket = max_bucket.max(bucket);
        }

        Some(Self {
            interval_ms,
            first_bucket: min_bucket,
            len: (max_bucket - min_bucket + 1) as usize,
        })
    }

    /// Bucket width in milliseconds.
    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Number of buckets in the grid.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the first bucket.
    pub fn first_bucket(&self) -> i64 {
        self.first_bucket
    }

    /// Grid position of a bucket index, if the bucket lies on the grid.
    pub fn position(&self, bucket: i64) -> Option<usize> {
        if bucket < self.first_bucket {
            return None;
        }
        let offset = (bucket - self.first_bucket) as usize;
        (offset < self.len).then_some(offset)
    }

    /// Start instant of the bucket at a grid position, in epoch milliseconds.
    pub fn bucket_start_ms(&self, position: usize) -> i64 {
        (self.first_bucket + position as i64) * self.interval_ms
    }

    /// Start instants of all buckets, in grid order.
    pub fn bucket_starts(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len).map(|p| self.bucket_start_ms(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_index_flooring() {
        assert_eq!(bucket_index(0.0, 60_000), 0);
        assert_eq!(bucket_index(59.999, 60_000), 0);
        assert_eq!(bucket_index(60.0, 60_000), 1);
        assert_eq!(bucket_index(61.0, 60_000), 1);
    }

    #[test]
    fn test_bucket_index_boundary_precision() {
        // 119.9999999 s rounds to 120000 ms and must land in bucket 2,
        // not fall back into bucket 1 through float flooring.
        assert_eq!(bucket_index(119.9999999, 60_000), 2);
    }

    #[test]
    fn test_grid_spans_min_to_max() {
        let grid = TimeGrid::from_reference(&[0.0, 30.0, 61.0, 90.0], DEFAULT_INTERVAL)
            .expect("non-empty reference");

        assert_eq!(grid.len(), 2);
        assert_eq!(grid.first_bucket(), 0);
        let starts: Vec<i64> = grid.bucket_starts().collect();
        assert_eq!(starts, vec![0, 60_000]);
    }

    #[test]
    fn test_grid_has_no_gaps() {
        // Samples only in the first and last minute; the middle minutes
        // still get buckets.
        let grid = TimeGrid::from_reference(&[0.0, 250.0], DEFAULT_INTERVAL).unwrap();
        assert_eq!(grid.len(), 5);

        let starts: Vec<i64> = grid.bucket_starts().collect();
        for pair in starts.windows(2) {
            assert_eq!(pair[1] - pair[0], 60_000);
        }
    }

    #[test]
    fn test_grid_single_sample() {
        let grid = TimeGrid::from_reference(&[1709301930.5], DEFAULT_INTERVAL).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.bucket_start_ms(0), 1709301900_000);
    }

    #[test]
    fn test_empty_reference_yields_no_grid() {
        assert!(TimeGrid::from_reference(&[], DEFAULT_INTERVAL).is_none());
    }

    #[test]
    fn test_position_lookup() {
        let grid = TimeGrid::from_reference(&[120.0, 250.0], DEFAULT_INTERVAL).unwrap();
        assert_eq!(grid.first_bucket(), 2);
        assert_eq!(grid.position(2), Some(0));
        assert_eq!(grid.position(4), Some(2));
        assert_eq!(grid.position(1), None);
        assert_eq!(grid.position(5), None);
    }
}
