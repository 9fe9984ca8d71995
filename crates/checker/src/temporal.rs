//! Temporal axis reconstruction and alignment.
//!
//! The canonical time axis is the sorted image timestamp sequence. When a
//! product was built with temporal resampling, consecutive frames collapse
//! into fixed-width buckets and the axis has one entry per bucket.
//!
//! # Bucket boundaries
//!
//! Windows are anchored at the first timestamp `t0` and are upper-inclusive:
//! window k covers `(t0 + k*R, t0 + (k+1)*R]`, with the first window also
//! closed at `t0`. Equivalently, a frame at offset `d` seconds lands in
//! window `ceil(d / R) - 1`, clamped to 0, so a frame exactly on a boundary
//! joins the earlier bucket. Windows containing no frame produce no bucket.
//! For evenly spaced frames with spacing <= R this yields exactly
//! `ceil(span / R)` buckets (minimum 1).

use chrono::{DateTime, Utc};
use tracing::debug;

use radar_common::{offset_from_epoch, parse_time_units, ProductDataset};

use crate::error::CheckError;

/// A group of consecutive frames sharing one resampling window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket<T> {
    /// Representative timestamp: the first member's.
    pub timestamp: DateTime<Utc>,
    /// Members in timestamp order.
    pub members: Vec<(DateTime<Utc>, T)>,
}

/// Window index of a timestamp at `d = ts - anchor` seconds.
fn window_index(anchor: DateTime<Utc>, resolution_secs: i64, ts: DateTime<Utc>) -> i64 {
    let d = (ts - anchor).num_seconds();
    if d <= 0 {
        0
    } else {
        (d + resolution_secs - 1) / resolution_secs - 1
    }
}

/// Partition a timestamp-sorted sequence into resampling buckets.
pub fn group_by_resolution<T>(
    items: Vec<(DateTime<Utc>, T)>,
    resolution_secs: u64,
) -> Vec<TimeBucket<T>> {
    debug_assert!(resolution_secs > 0);
    let resolution = resolution_secs as i64;

    let mut buckets: Vec<TimeBucket<T>> = Vec::new();
    let mut anchor: Option<DateTime<Utc>> = None;
    let mut current: Option<i64> = None;

    for (ts, item) in items {
        let anchor = *anchor.get_or_insert(ts);
        let index = window_index(anchor, resolution, ts);
        if current != Some(index) {
            buckets.push(TimeBucket {
                timestamp: ts,
                members: Vec::new(),
            });
            current = Some(index);
        }
        if let Some(bucket) = buckets.last_mut() {
            bucket.members.push((ts, item));
        }
    }
    buckets
}

/// Checks the stored time axis against the image timestamp sequence.
pub struct TemporalAligner<'a> {
    timestamps: &'a [DateTime<Utc>],
    resolution: Option<u64>,
}

impl<'a> TemporalAligner<'a> {
    pub fn new(timestamps: &'a [DateTime<Utc>], resolution: Option<u64>) -> Self {
        Self {
            timestamps,
            resolution,
        }
    }

    /// The timestamps the stored axis must reproduce, in order.
    pub fn expected_axis(&self) -> Vec<DateTime<Utc>> {
        match self.resolution {
            None => self.timestamps.to_vec(),
            Some(resolution) => {
                let items = self.timestamps.iter().map(|&ts| (ts, ())).collect();
                group_by_resolution(items, resolution)
                    .into_iter()
                    .map(|bucket| bucket.timestamp)
                    .collect()
            }
        }
    }

    pub fn check(&self, product: &dyn ProductDataset) -> Result<(), CheckError> {
        let units = product.time_units()?;
        let epoch = parse_time_units(&units)?;

        let expected = self.expected_axis();
        let offsets = product.time_offsets()?;
        if offsets.len() != expected.len() {
            return Err(CheckError::TimeAxisLength {
                expected: expected.len(),
                actual: offsets.len(),
            });
        }

        for (index, (&offset, &want)) in offsets.iter().zip(expected.iter()).enumerate() {
            let stored = offset_from_epoch(epoch, offset);
            if stored != want {
                return Err(CheckError::TimeValue {
                    index,
                    actual: stored,
                    expected: want,
                });
            }
        }
        debug!(entries = offsets.len(), "time axis matches");
        Ok(())
    }
}
