// File: crates/mmr-chart/src/scale.rs
// Summary: Time (X) and Value (Y) affine scales with exact inverses, and the scale engine.

use chrono::{DateTime, Utc};

use crate::error::{ChartError, Result};
use crate::geometry::RectF32;
use crate::series::{value_extent, Sample};
use crate::types::{Insets, Size};
use crate::view::ViewWindow;

/// Horizontal time scale: `[start, end]` (epoch millis) onto `[left_px, right_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f32,
    pub right_px: f32,
    pub start_ms: f64,
    pub end_ms: f64,
}

impl TimeScale {
    pub fn new(left_px: f32, right_px: f32, start_ms: f64, end_ms: f64) -> Self {
        let end_ms = if end_ms - start_ms < 1.0 { start_ms + 1.0 } else { end_ms };
        Self { left_px, right_px, start_ms, end_ms }
    }

    #[inline]
    fn span_ms(&self) -> f64 { self.end_ms - self.start_ms }

    #[inline]
    fn span_px(&self) -> f64 { (self.right_px - self.left_px) as f64 }

    #[inline]
    pub fn to_px_ms(&self, ms: f64) -> f32 {
        (self.left_px as f64 + (ms - self.start_ms) / self.span_ms() * self.span_px()) as f32
    }

    #[inline]
    pub fn to_px(&self, t: DateTime<Utc>) -> f32 {
        self.to_px_ms(t.timestamp_millis() as f64)
    }

    #[inline]
    pub fn from_px_ms(&self, px: f32) -> f64 {
        self.start_ms + (px - self.left_px) as f64 / self.span_px() * self.span_ms()
    }

    /// Timestamp under a pixel column. Pixels far outside the axis saturate at
    /// the representable range instead of failing.
    pub fn from_px(&self, px: f32) -> DateTime<Utc> {
        let ms = self.from_px_ms(px).round();
        DateTime::<Utc>::from_timestamp_millis(ms as i64).unwrap_or(if ms < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    /// Milliseconds covered by one horizontal pixel.
    pub fn ms_per_px(&self) -> f64 {
        self.span_ms() / self.span_px().max(1.0)
    }
}

/// Vertical value scale mapping `[vmin, vmax]` onto `[bottom_px, top_px]` (inverted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: f64, vmax: f64) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }
    #[inline]
    pub fn to_px(&self, y: f64) -> f32 {
        let span = self.vmax - self.vmin;
        (self.bottom_px as f64 - (y - self.vmin) / span * (self.bottom_px - self.top_px) as f64) as f32
    }
    #[inline]
    pub fn from_px(&self, py: f32) -> f64 {
        let span = self.vmax - self.vmin;
        self.vmin + (self.bottom_px - py) as f64 / (self.bottom_px - self.top_px) as f64 * span
    }
}

/// Both axes for one frame. Recomputed, never cached across window or size changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scales {
    pub time: TimeScale,
    pub value: ValueScale,
    pub plot: RectF32,
    pub size: Size,
}

/// Inputs of the scale engine.
pub struct ScaleInputs<'a> {
    pub window: ViewWindow,
    pub size: Size,
    pub insets: &'a Insets,
    /// Samples inside `window`.
    pub visible: &'a [Sample],
    /// Whole sample set, the fallback when nothing is visible.
    pub all: &'a [Sample],
    pub value_padding: f64,
}

/// Pure mapping from window + container + data to pixel space.
pub fn compute_scales(inputs: &ScaleInputs<'_>) -> Result<Scales> {
    let plot = RectF32::plot_area(inputs.size, inputs.insets);
    if !inputs.size.is_measurable() || plot.is_empty() {
        return Err(ChartError::RenderPrecondition {
            width: inputs.size.width,
            height: inputs.size.height,
        });
    }

    let (lo, hi) = value_extent(inputs.visible)
        .or_else(|| value_extent(inputs.all))
        .unwrap_or((0.0, 1.0));
    let pad = inputs.value_padding.max(0.0);

    let time = TimeScale::new(
        plot.left,
        plot.right,
        inputs.window.start.timestamp_millis() as f64,
        inputs.window.end.timestamp_millis() as f64,
    );
    let value = ValueScale::new_linear(plot.top, plot.bottom, lo - pad, hi + pad);
    Ok(Scales { time, value, plot, size: inputs.size })
}
