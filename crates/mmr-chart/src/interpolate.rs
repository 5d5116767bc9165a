// File: crates/mmr-chart/src/interpolate.rs
// Summary: Exact-or-interpolated readings at arbitrary timestamps, and rank bucketing of values.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::series::{Sample, SampleSet};

/// Number of sub-buckets (divisions) inside one tier.
pub const SUB_BUCKETS: u32 = 4;

/// One rung of the rank ladder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub min: f64,
}

/// Colour family for bands: every tier whose name starts with `prefix`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandFamily {
    pub prefix: String,
    pub color: String,
}

/// Ordered value thresholds mapping a rating onto a named tier and division.
///
/// Tiers must be strictly increasing by `min`. The last tier has no successor,
/// so its division width comes from `top_tier_span`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankLadder {
    pub tiers: Vec<Tier>,
    pub top_tier_span: f64,
    pub families: Vec<BandFamily>,
}

impl Default for RankLadder {
    /// Rumble playlist cutoffs.
    fn default() -> Self {
        const TIERS: [(&str, f64); 22] = [
            ("Bronze I", 0.0),
            ("Bronze II", 76.0),
            ("Bronze III", 136.0),
            ("Silver I", 196.0),
            ("Silver II", 256.0),
            ("Silver III", 316.0),
            ("Gold I", 376.0),
            ("Gold II", 436.0),
            ("Gold III", 496.0),
            ("Platinum I", 556.0),
            ("Platinum II", 616.0),
            ("Platinum III", 696.0),
            ("Diamond I", 776.0),
            ("Diamond II", 856.0),
            ("Diamond III", 936.0),
            ("Champion I", 1016.0),
            ("Champion II", 1096.0),
            ("Champion III", 1176.0),
            ("Grand Champion I", 1435.0),
            ("Grand Champion II", 1535.0),
            ("Grand Champion III", 1635.0),
            ("Supersonic Legend", 1862.0),
        ];
        // Longest prefix first so "Grand Champion" wins over "Champion".
        const FAMILIES: [(&str, &str); 8] = [
            ("Supersonic Legend", "rgba(251, 163, 177, 0.25)"),
            ("Grand Champion", "rgba(227, 150, 68, 0.25)"),
            ("Champion", "rgba(142, 89, 225, 0.25)"),
            ("Diamond", "rgba(37, 161, 213, 0.25)"),
            ("Platinum", "rgba(0, 182, 182, 0.25)"),
            ("Gold", "rgba(212, 175, 55, 0.25)"),
            ("Silver", "rgba(169, 169, 169, 0.25)"),
            ("Bronze", "rgba(139, 90, 43, 0.25)"),
        ];
        Self {
            tiers: TIERS.iter().map(|&(name, min)| Tier { name: name.to_string(), min }).collect(),
            top_tier_span: 200.0,
            families: FAMILIES
                .iter()
                .map(|&(prefix, color)| BandFamily { prefix: prefix.to_string(), color: color.to_string() })
                .collect(),
        }
    }
}

/// Result of bucketing a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub tier: String,
    pub division: u32,
    /// Upper bound of the tier (next tier's minimum, or `min + top_tier_span`).
    pub tier_max: f64,
    pub tier_min: f64,
}

impl Bucket {
    pub fn division_label(&self) -> String {
        format!("Division {}", self.division)
    }
}

impl RankLadder {
    /// Greatest tier whose `min <= value`; values below the ladder land on the
    /// first tier. `None` only for an empty ladder.
    pub fn bucket(&self, value: f64) -> Option<Bucket> {
        self.tiers.first()?;
        let idx = self.tiers.partition_point(|t| t.min <= value);
        let i = idx.saturating_sub(1);
        let tier = &self.tiers[i];
        let tier_max = self
            .tiers
            .get(i + 1)
            .map(|next| next.min)
            .unwrap_or(tier.min + self.top_tier_span);
        let spread = (tier_max - tier.min) / SUB_BUCKETS as f64;
        let pos = (value - tier.min).max(0.0);
        let division = if spread > 0.0 {
            ((pos / spread).floor() as u32 + 1).min(SUB_BUCKETS)
        } else {
            1
        };
        Some(Bucket { tier: tier.name.clone(), division, tier_max, tier_min: tier.min })
    }

    /// Band colour of the family a tier belongs to.
    pub fn family_color(&self, tier: &str) -> Option<&str> {
        self.families
            .iter()
            .find(|f| tier.starts_with(f.prefix.as_str()))
            .map(|f| f.color.as_str())
    }
}

/// What the tooltip and marker show for a timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub category_label: String,
    pub sub_bucket: String,
    /// `true` when this is a real observation rather than an estimate.
    pub exact: bool,
}

impl Reading {
    fn from_sample(s: &Sample) -> Self {
        Self {
            timestamp: s.timestamp,
            value: s.value,
            category_label: s.category_label.clone(),
            sub_bucket: s.sub_bucket.clone(),
            exact: true,
        }
    }

    fn unknown(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: 0.0,
            category_label: "Unknown".to_string(),
            sub_bucket: "Unknown".to_string(),
            exact: false,
        }
    }
}

/// Reads the sample set at arbitrary timestamps.
pub struct Interpolator<'a> {
    samples: &'a SampleSet,
    ladder: &'a RankLadder,
    snap: Duration,
}

impl<'a> Interpolator<'a> {
    pub fn new(samples: &'a SampleSet, ladder: &'a RankLadder, snap: Duration) -> Self {
        Self { samples, ladder, snap }
    }

    pub fn value_at(&self, t: DateTime<Utc>) -> Reading {
        let data = self.samples.as_slice();
        let (Some(first), Some(last)) = (data.first(), data.last()) else {
            return Reading::unknown(t);
        };
        if t <= first.timestamp {
            return Reading::from_sample(first);
        }
        if t >= last.timestamp {
            return Reading::from_sample(last);
        }

        // first < t < last, so 1 <= hi <= len - 1.
        let hi = self.samples.lower_bound(t);
        if hi == 0 || hi >= data.len() {
            return Reading::unknown(t);
        }
        let (a, b) = (&data[hi - 1], &data[hi]);

        if t - a.timestamp < self.snap {
            return Reading::from_sample(a);
        }
        if b.timestamp - t < self.snap {
            return Reading::from_sample(b);
        }

        let span = (b.millis() - a.millis()) as f64;
        let ratio = if span > 0.0 { (t.timestamp_millis() - a.millis()) as f64 / span } else { 0.0 };
        let value = a.value + ratio * (b.value - a.value);
        match self.ladder.bucket(value) {
            Some(bucket) => Reading {
                timestamp: t,
                value,
                category_label: bucket.tier.clone(),
                sub_bucket: bucket.division_label(),
                exact: false,
            },
            None => Reading { value, ..Reading::unknown(t) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_divisions_split_tier_in_quarters() {
        let ladder = RankLadder::default();
        // Champion III spans 1176..1435 (259), quarter = 64.75
        let b = ladder.bucket(1176.0).unwrap();
        assert_eq!((b.tier.as_str(), b.division), ("Champion III", 1));
        assert_eq!(ladder.bucket(1241.0).unwrap().division, 2);
        assert_eq!(ladder.bucket(1434.9).unwrap().division, 4);
        assert_eq!(ladder.bucket(1435.0).unwrap().tier, "Grand Champion I");
    }

    #[test]
    fn bucket_edges() {
        let ladder = RankLadder::default();
        let below = ladder.bucket(-20.0).unwrap();
        assert_eq!((below.tier.as_str(), below.division), ("Bronze I", 1));
        let top = ladder.bucket(5000.0).unwrap();
        assert_eq!((top.tier.as_str(), top.division), ("Supersonic Legend", 4));
        assert_eq!(ladder.bucket(1912.0).unwrap().division, 2);
        assert!(RankLadder { tiers: vec![], ..RankLadder::default() }.bucket(10.0).is_none());
    }

    #[test]
    fn family_prefers_longest_prefix() {
        let ladder = RankLadder::default();
        assert_eq!(ladder.family_color("Grand Champion II"), Some("rgba(227, 150, 68, 0.25)"));
        assert_eq!(ladder.family_color("Champion I"), Some("rgba(142, 89, 225, 0.25)"));
        assert_eq!(ladder.family_color("Unranked"), None);
    }
}
