//! Per-channel aggregation onto bucket indices.
//!
//! Continuous signals (acceleration axes, heart rate) aggregate by
//! arithmetic mean; a bucket nobody sampled stays out of the map entirely,
//! so downstream alignment can tell "no data" apart from "aggregate is
//! zero". Counters aggregate by summed increments or event counts.

use std::collections::BTreeMap;

use crate::core::grid::bucket_index;
use crate::source::Sample;

/// Mean of the samples falling into each bucket.
///
/// Buckets with no samples do not appear in the result.
pub fn mean_by_bucket(
    samples: impl IntoIterator<Item = Sample>,
    interval_ms: i64,
) -> BTreeMap<i64, f64> {
    let mut sums: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for sample in samples {
        let entry = sums
            .entry(bucket_index(sample.timestamp, interval_ms))
            .or_insert((0.0, 0));
        entry.0 += sample.value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(bucket, (sum, count))| (bucket, sum / count as f64))
        .collect()
}

/// Number of raw events falling into each bucket.
///
/// Each timestamp counts as one discrete event. Buckets with no events do
/// not appear in the result; alignment fills those with zero for a present
/// channel.
pub fn count_events(timestamps: &[f64], interval_ms: i64) -> BTreeMap<i64, f64> {
    let mut counts: BTreeMap<i64, f64> = BTreeMap::new();
    for &t in timestamps {
        *counts.entry(bucket_index(t, interval_ms)).or_insert(0.0) += 1.0;
    }
    counts
}

/// Newly accumulated counter value per bucket.
///
/// Consecutive differences of the running counter are clipped to a minimum
/// of zero, so a counter reset never subtracts from a bucket. Each
/// difference lands in the bucket of the later sample, where the increase
/// was observed.
pub fn sum_counter_increments(
    samples: impl IntoIterator<Item = Sample>,
    interval_ms: i64,
) -> BTreeMap<i64, f64> {
    let mut sums: BTreeMap<i64, f64> = BTreeMap::new();
    let mut previous: Option<Sample> = None;

    for sample in samples {
        if let Some(prev) = previous {
            let increment = (sample.value - prev.value).max(0.0);
            *sums
                .entry(bucket_index(sample.timestamp, interval_ms))
                .or_insert(0.0) += increment;
        }
        previous = Some(sample);
    }

    sums
}
