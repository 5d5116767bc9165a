// File: crates/mmr-chart/src/feed.rs
// Summary: Rating feed wire format (JSON) and the loader that turns it into a validated Dataset.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::series::{CategoryBand, Dataset, Profile, Sample, SampleSet, Summary};
use crate::theme::{parse_css_color, FALLBACK_BAND};

/// Feed document as published next to the page (`data/mmr-data.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<FeedProfile>,
    pub current_rating: FeedCurrent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_thresholds: Option<FeedThresholds>,
    #[serde(default)]
    pub rank_bands: Vec<FeedBand>,
    pub data_points: Vec<FeedPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedProfile {
    pub platform: String,
    pub platform_username: String,
    pub playlist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedCurrent {
    pub mmr: f64,
    pub rank: String,
    pub division: Division,
    #[serde(default)]
    pub matches: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedBand {
    pub name: String,
    pub min_mmr: f64,
    pub max_mmr: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedPoint {
    pub date: String,
    pub mmr: f64,
    pub rank: String,
    pub division: Division,
}

/// Division is a bare number on data points and `"Division N"` on the summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Division {
    Number(u32),
    Text(String),
}

impl Division {
    pub fn label(&self) -> String {
        match self {
            Division::Number(n) => format!("Division {n}"),
            Division::Text(s) => s.clone(),
        }
    }
}

/// Where the feed comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    Path(PathBuf),
    Url(String),
}

impl FeedSource {
    /// `http(s)://` becomes a URL, anything else a file path.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSource::Url(raw.to_string())
        } else {
            FeedSource::Path(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Path(p) => write!(f, "{}", p.display()),
            FeedSource::Url(u) => f.write_str(u),
        }
    }
}

/// Retrieve and validate a feed. Any failure is terminal for this chart.
pub fn load(source: &FeedSource, config: &ChartConfig) -> Result<Dataset> {
    let body = fetch(source)?;
    let dataset = parse_feed(&body, config)?;
    log::info!(
        "loaded {} samples and {} bands from {source}",
        dataset.samples.len(),
        dataset.bands.len()
    );
    Ok(dataset)
}

fn fetch(source: &FeedSource) -> Result<String> {
    match source {
        FeedSource::Path(path) => std::fs::read_to_string(path)
            .map_err(|e| ChartError::Fetch(format!("{}: {e}", path.display()))),
        FeedSource::Url(url) => fetch_url(url),
    }
}

#[cfg(feature = "http")]
fn fetch_url(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url).map_err(|e| ChartError::Fetch(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ChartError::Fetch(format!("{url}: HTTP {status}")));
    }
    response.text().map_err(|e| ChartError::Fetch(e.to_string()))
}

#[cfg(not(feature = "http"))]
fn fetch_url(url: &str) -> Result<String> {
    Err(ChartError::Fetch(format!("{url}: built without the `http` feature")))
}

/// Parse a feed body into a dataset.
pub fn parse_feed(body: &str, config: &ChartConfig) -> Result<Dataset> {
    let feed: Feed = serde_json::from_str(body)?;
    feed.into_dataset(config)
}

impl Feed {
    pub fn into_dataset(self, config: &ChartConfig) -> Result<Dataset> {
        let mut samples = Vec::with_capacity(self.data_points.len());
        for (i, p) in self.data_points.into_iter().enumerate() {
            let timestamp = parse_instant(&p.date)
                .ok_or_else(|| ChartError::Parse(format!("dataPoints[{i}]: bad date {:?}", p.date)))?;
            if !p.mmr.is_finite() {
                return Err(ChartError::Parse(format!("dataPoints[{i}]: non-finite mmr")));
            }
            samples.push(Sample::new(timestamp, p.mmr, p.rank, p.division.label()));
        }
        if samples.is_empty() {
            return Err(ChartError::Parse("feed has no data points".to_string()));
        }

        let bands = self
            .rank_bands
            .into_iter()
            .filter(|b| b.min_mmr.is_finite() && b.max_mmr.is_finite())
            .map(|b| {
                let color = parse_css_color(&b.color).unwrap_or_else(|| {
                    log::warn!("band {:?}: unparsable color {:?}", b.name, b.color);
                    FALLBACK_BAND
                });
                CategoryBand {
                    lower_bound: b.min_mmr.min(b.max_mmr),
                    upper_bound: b.min_mmr.max(b.max_mmr),
                    label: b.name,
                    color,
                }
            })
            .collect();

        let last_updated = self.last_updated.as_deref().and_then(|raw| {
            let parsed = parse_instant(raw);
            if parsed.is_none() {
                log::warn!("ignoring unparsable lastUpdated {raw:?}");
            }
            parsed
        });

        let summary = Summary {
            value: self.current_rating.mmr,
            category_label: self.current_rating.rank,
            sub_bucket: self.current_rating.division.label(),
            observations: self.current_rating.matches,
            last_updated,
        };

        let profile = self
            .profile
            .map(|p| Profile {
                platform: p.platform,
                username: p.platform_username,
                playlist: p.playlist,
                playlist_id: p.playlist_id,
            })
            .unwrap_or_default();

        let reference_threshold = self
            .rank_thresholds
            .and_then(|t| t.gc1)
            .filter(|v| v.is_finite())
            .unwrap_or(config.reference_threshold);

        Ok(Dataset {
            samples: SampleSet::new(samples),
            bands,
            summary,
            profile,
            reference_threshold,
        })
    }
}

/// Accepts RFC 3339, naive ISO-8601 date-times (taken as UTC) and bare dates.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamp_variants() {
        let z = parse_instant("2025-10-01T12:00:00Z").unwrap();
        let off = parse_instant("2025-10-01T14:00:00+02:00").unwrap();
        let naive = parse_instant("2025-10-01T12:00:00.000").unwrap();
        assert_eq!(z, off);
        assert_eq!(z, naive);
        assert_eq!(parse_instant("2025-10-01").unwrap().to_rfc3339(), "2025-10-01T00:00:00+00:00");
        assert!(parse_instant("yesterday").is_none());
    }

    #[test]
    fn source_kind_from_string() {
        assert_eq!(FeedSource::parse("HTTPS://x/y.json"), FeedSource::Url("HTTPS://x/y.json".into()));
        assert_eq!(FeedSource::parse("data/mmr-data.json"), FeedSource::Path("data/mmr-data.json".into()));
    }
}
