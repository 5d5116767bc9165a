// File: crates/mmr-chart/src/config.rs
// Summary: Chart configuration (paddings, steps, zoom tuning, marker, rank ladder), loadable from JSON.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interpolate::RankLadder;
use crate::types::Insets;
use crate::view::ZoomSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub padding: Insets,
    /// Added above and below the visible value range.
    pub value_padding: f64,
    pub grid_value_step: f64,
    pub label_value_step: f64,
    pub snap_threshold_hours: i64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub min_zoom_span_days: i64,
    pub point_radius: f32,
    /// Extra pixels around a data point that still count as a click on it.
    pub hit_tolerance: f32,
    pub tooltip: TooltipSize,
    pub resize_debounce_ms: u64,
    pub theme: String,
    pub marker: Option<MarkerConfig>,
    /// Directory the marker image path is resolved against.
    pub asset_root: PathBuf,
    /// Used when the feed has no `rankThresholds.gc1`.
    pub reference_threshold: f64,
    pub ladder: RankLadder,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSize {
    pub width: f32,
    pub height: f32,
}

impl Default for TooltipSize {
    fn default() -> Self {
        Self { width: 200.0, height: 120.0 }
    }
}

/// The single annotated event on the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// `YYYY-MM-DD` or RFC 3339.
    pub date: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default = "default_marker_color")]
    pub color: String,
    #[serde(default = "default_marker_image_size")]
    pub image_size: f32,
}

fn default_marker_color() -> String {
    "#ff69b4".to_string()
}

fn default_marker_image_size() -> f32 {
    48.0
}

impl MarkerConfig {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        crate::feed::parse_instant(&self.date)
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding: Insets::default(),
            value_padding: 50.0,
            grid_value_step: 50.0,
            label_value_step: 100.0,
            snap_threshold_hours: 12,
            zoom_in_factor: 0.85,
            zoom_out_factor: 1.15,
            min_zoom_span_days: 14,
            point_radius: 4.0,
            hit_tolerance: 3.0,
            tooltip: TooltipSize::default(),
            resize_debounce_ms: 250,
            theme: "dark".to_string(),
            marker: Some(MarkerConfig {
                date: "2025-11-28".to_string(),
                label: "Controller Acquired!".to_string(),
                image: Some(PathBuf::from("assets/img/controller_sm.png")),
                color: default_marker_color(),
                image_size: default_marker_image_size(),
            }),
            asset_root: PathBuf::from("."),
            reference_threshold: 1435.0,
            ladder: RankLadder::default(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg: ChartConfig = serde_json::from_str(&raw)?;
        log::info!("loaded chart config from {}", path.as_ref().display());
        Ok(cfg)
    }

    /// Out-of-range hour counts fall back to the 12 h default.
    pub fn snap_threshold(&self) -> Duration {
        Duration::try_hours(self.snap_threshold_hours.max(0)).unwrap_or_else(|| {
            log::warn!("snap_threshold_hours {} out of range, using 12", self.snap_threshold_hours);
            Duration::hours(12)
        })
    }

    pub fn zoom_settings(&self) -> ZoomSettings {
        let finite_or = |v: f64, default: f64| if v.is_finite() { v } else { default };
        ZoomSettings {
            zoom_in_factor: finite_or(self.zoom_in_factor, 0.85).clamp(0.01, 0.999),
            zoom_out_factor: finite_or(self.zoom_out_factor, 1.15).max(1.001),
            min_span: Duration::try_days(self.min_zoom_span_days.max(0)).unwrap_or_else(|| {
                log::warn!("min_zoom_span_days {} out of range, using 14", self.min_zoom_span_days);
                Duration::days(14)
            }),
        }
    }

    pub fn resize_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ChartConfig = serde_json::from_str(r#"{ "min_zoom_span_days": 7, "marker": null }"#).unwrap();
        assert_eq!(cfg.min_zoom_span_days, 7);
        assert!(cfg.marker.is_none());
        assert_eq!(cfg.padding, Insets::new(60, 20, 20, 40));
        assert_eq!(cfg.ladder.tiers.len(), 22);
    }

    #[test]
    fn marker_date_accepts_plain_dates() {
        let m = ChartConfig::default().marker.unwrap();
        assert_eq!(m.timestamp().unwrap().to_rfc3339(), "2025-11-28T00:00:00+00:00");
    }

    #[test]
    fn out_of_range_durations_fall_back() {
        let cfg: ChartConfig = serde_json::from_str(
            r#"{ "snap_threshold_hours": 9223372036854775807, "min_zoom_span_days": 9223372036854775807 }"#,
        )
        .unwrap();
        assert_eq!(cfg.snap_threshold(), Duration::hours(12));
        assert_eq!(cfg.zoom_settings().min_span, Duration::days(14));

        let negative = ChartConfig { snap_threshold_hours: -5, min_zoom_span_days: -1, ..ChartConfig::default() };
        assert_eq!(negative.snap_threshold(), Duration::zero());
        assert_eq!(negative.zoom_settings().min_span, Duration::zero());
    }
}
