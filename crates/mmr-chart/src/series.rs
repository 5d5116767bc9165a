// File: crates/mmr-chart/src/series.rs
// Summary: Rating samples, category bands and the loaded dataset shared read-only by all components.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use skia_safe as skia;

/// One historical rating observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub category_label: String,
    pub sub_bucket: String,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        value: f64,
        category_label: impl Into<String>,
        sub_bucket: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            value,
            category_label: category_label.into(),
            sub_bucket: sub_bucket.into(),
        }
    }

    #[inline]
    pub fn millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Samples sorted ascending by timestamp. Immutable once built; clones share storage.
#[derive(Clone, Debug, Default)]
pub struct SampleSet {
    samples: Arc<[Sample]>,
}

impl SampleSet {
    /// Build from samples in any order; the sort is stable so equal timestamps
    /// keep feed order.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples: samples.into() }
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn as_slice(&self) -> &[Sample] { &self.samples }
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> { self.samples.iter() }
    pub fn get(&self, idx: usize) -> Option<&Sample> { self.samples.get(idx) }
    pub fn first(&self) -> Option<&Sample> { self.samples.first() }
    pub fn last(&self) -> Option<&Sample> { self.samples.last() }

    /// Index of the first sample with `timestamp >= t`.
    pub fn lower_bound(&self, t: DateTime<Utc>) -> usize {
        self.samples.partition_point(|s| s.timestamp < t)
    }

    /// Index one past the last sample with `timestamp <= t`.
    pub fn upper_bound(&self, t: DateTime<Utc>) -> usize {
        self.samples.partition_point(|s| s.timestamp <= t)
    }

    /// Samples whose timestamp lies in `[start, end]`.
    pub fn in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[Sample] {
        let lo = self.lower_bound(start);
        let hi = self.upper_bound(end).max(lo);
        &self.samples[lo..hi]
    }

    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }
}

/// Min/max value over a slice of samples; `None` when empty.
pub fn value_extent(samples: &[Sample]) -> Option<(f64, f64)> {
    let mut it = samples.iter();
    let first = it.next()?.value;
    Some(it.fold((first, first), |(lo, hi), s| (lo.min(s.value), hi.max(s.value))))
}

/// A named value range painted as a horizontal background band.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBand {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub label: String,
    pub color: skia::Color,
}

/// Latest-rating snapshot shipped with the feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub value: f64,
    pub category_label: String,
    pub sub_bucket: String,
    pub observations: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub platform: String,
    pub username: String,
    pub playlist: String,
    pub playlist_id: Option<u32>,
}

/// Everything loaded from one feed document.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub samples: SampleSet,
    pub bands: Vec<CategoryBand>,
    pub summary: Summary,
    pub profile: Profile,
    /// Value the stats bar and tooltip measure distance against (Grand Champion I).
    pub reference_threshold: f64,
}
