// File: crates/mmr-chart/src/marker.rs
// Summary: The annotated event marker, resolved against the data through the interpolator.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use skia_safe as skia;

use crate::config::MarkerConfig;
use crate::interpolate::Interpolator;
use crate::theme::parse_css_color;
use crate::view::ViewWindow;

const DEFAULT_COLOR: skia::Color = skia::Color::new(0xffff_69b4);

/// Marker artwork decoded once at resolve time; frames only blit it.
#[derive(Clone)]
pub struct MarkerImage(pub skia::Image);

impl MarkerImage {
    /// `None` (logged at debug) when the file is missing or not an image.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("marker image {}: {e}", path.display());
                return None;
            }
        };
        match skia::Image::from_encoded(skia::Data::new_copy(&bytes)) {
            Some(image) => Some(Self(image)),
            None => {
                log::debug!("{}: not a decodable image", path.display());
                None
            }
        }
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.0.width(), self.0.height())
    }
}

impl PartialEq for MarkerImage {
    fn eq(&self, other: &Self) -> bool {
        self.0.unique_id() == other.0.unique_id()
    }
}

impl std::fmt::Debug for MarkerImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "MarkerImage({w}x{h})")
    }
}

/// A single highlighted instant on the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub timestamp: DateTime<Utc>,
    /// Value read off the series at `timestamp` (exact or interpolated).
    pub value: f64,
    pub label: String,
    pub image: Option<PathBuf>,
    /// `image` decoded; `None` when the file is missing or unreadable.
    pub decoded: Option<MarkerImage>,
    pub color: skia::Color,
    pub image_size: f32,
}

impl Marker {
    /// `None` when the configured date cannot be parsed.
    pub fn resolve(cfg: &MarkerConfig, asset_root: &Path, interp: &Interpolator<'_>) -> Option<Self> {
        let Some(timestamp) = cfg.timestamp() else {
            log::warn!("marker date {:?} is not a date; marker disabled", cfg.date);
            return None;
        };
        let reading = interp.value_at(timestamp);
        let image = cfg.image.as_ref().map(|p| if p.is_absolute() { p.clone() } else { asset_root.join(p) });
        let decoded = image.as_deref().and_then(MarkerImage::load);
        Some(Self {
            timestamp,
            value: reading.value,
            label: cfg.label.clone(),
            image,
            decoded,
            color: parse_css_color(&cfg.color).unwrap_or(DEFAULT_COLOR),
            image_size: cfg.image_size.max(0.0),
        })
    }

    pub fn is_visible(&self, window: &ViewWindow) -> bool {
        window.contains(self.timestamp)
    }
}
