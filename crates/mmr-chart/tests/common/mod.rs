// File: crates/mmr-chart/tests/common/mod.rs
// Purpose: Shared builders for integration tests (synthetic datasets, fixture feed).
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use mmr_chart::series::{Profile, Summary};
use mmr_chart::{ChartConfig, Dataset, Sample, SampleSet};

/// Midnight UTC, `n` days after 2025-10-01.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

pub fn dataset(points: &[(DateTime<Utc>, f64)]) -> Dataset {
    let samples = points
        .iter()
        .map(|&(t, v)| Sample::new(t, v, "Champion III", "Division 1"))
        .collect();
    let last = points.last().map(|p| p.1).unwrap_or(0.0);
    Dataset {
        samples: SampleSet::new(samples),
        bands: Vec::new(),
        summary: Summary {
            value: last,
            category_label: "Champion III".to_string(),
            sub_bucket: "Division 1".to_string(),
            observations: points.len() as u64,
            last_updated: None,
        },
        profile: Profile::default(),
        reference_threshold: 1435.0,
    }
}

/// One sample per day over `[0, days]`, gently rising.
pub fn daily(days: i64) -> Dataset {
    let pts: Vec<_> = (0..=days).map(|d| (day(d), 1200.0 + d as f64 * 2.0)).collect();
    dataset(&pts)
}

/// Config without the marker, so tests do not depend on asset files.
pub fn plain_config() -> ChartConfig {
    ChartConfig { marker: None, ..ChartConfig::default() }
}

pub fn fixture_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mmr-data.json")
}

pub fn fixture_body() -> String {
    std::fs::read_to_string(fixture_path()).expect("read fixture feed")
}

pub fn fixture_dataset(cfg: &ChartConfig) -> Dataset {
    mmr_chart::parse_feed(&fixture_body(), cfg).expect("fixture parses")
}
