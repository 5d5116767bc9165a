// File: crates/mmr-chart/src/scene.rs
// Summary: Backend-neutral display list for one frame: layered primitives plus hit-test data.

use std::path::PathBuf;

use skia_safe as skia;

use crate::axis::month_label;
use crate::config::ChartConfig;
use crate::geometry::RectF32;
use crate::grid::{month_starts, value_ticks};
use crate::marker::{Marker, MarkerImage};
use crate::scale::Scales;
use crate::series::Dataset;
use crate::theme::Theme;
use crate::tooltip::Tooltip;
use crate::types::Size;
use crate::view::ViewWindow;

pub type Point = (f32, f32);

/// Drawing layers, bottom to top. Items are always emitted in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Bands,
    Grid,
    MarkerBackground,
    Line,
    Points,
    MarkerForeground,
    Axes,
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: skia::Color,
    pub width: f32,
    /// `[on, off]` dash intervals.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: skia::Color, width: f32) -> Self {
        Self { color, width, dash: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect { rect: RectF32, fill: skia::Color, stroke: Option<Stroke>, corner_radius: f32 },
    Line { from: Point, to: Point, stroke: Stroke },
    /// Straight segments, clipped to `clip`.
    Polyline { points: Vec<Point>, stroke: Stroke, clip: RectF32 },
    Circle { center: Point, radius: f32, fill: skia::Color, stroke: Option<Stroke> },
    /// `at` is the baseline position.
    Text { at: Point, text: String, size: f32, color: skia::Color, anchor: TextAnchor },
    Image { rect: RectF32, path: PathBuf, decoded: Option<MarkerImage> },
}

/// One entry of the display list. `class` names the element for SVG export.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub layer: Layer,
    pub class: &'static str,
    pub primitive: Primitive,
}

/// Screen position of a drawn data point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointHit {
    /// Index into the dataset's sample set.
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub size: Size,
    pub plot: RectF32,
    pub background: skia::Color,
    items: Vec<Item>,
    points: Vec<PointHit>,
    hit_radius: f32,
    reset_control: Option<RectF32>,
    marker_anchor: Option<Point>,
}

/// Everything a frame is built from.
pub struct SceneInputs<'a> {
    pub dataset: &'a Dataset,
    pub scales: &'a Scales,
    pub window: ViewWindow,
    pub marker: Option<&'a Marker>,
    pub theme: &'a Theme,
    pub config: &'a ChartConfig,
    /// Whether the window is narrower than the full range.
    pub zoomed: bool,
}

const RESET_LABEL: &str = "Reset zoom";
const RESET_SIZE: (f32, f32) = (88.0, 24.0);
const LABEL_SIZE: f32 = 11.0;

fn with_alpha(c: skia::Color, opacity: f32) -> skia::Color {
    let a = (c.a() as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(a, c.r(), c.g(), c.b())
}

impl Scene {
    /// Rebuild every layer from scratch. Pure function of its inputs.
    pub fn build(inp: &SceneInputs<'_>) -> Self {
        let plot = inp.scales.plot;
        let mut scene = Scene {
            size: inp.scales.size,
            plot,
            background: inp.theme.background,
            items: Vec::new(),
            points: Vec::new(),
            hit_radius: inp.config.point_radius + inp.config.hit_tolerance.max(0.0),
            reset_control: None,
            marker_anchor: None,
        };
        let marker = inp.marker.filter(|m| m.is_visible(&inp.window));

        scene.bands(inp);
        scene.grid(inp);
        if let Some(m) = marker {
            scene.marker_background(m, inp.scales);
        }
        scene.line(inp);
        scene.data_points(inp);
        if let Some(m) = marker {
            scene.marker_foreground(m, inp.scales, inp.theme);
        }
        scene.axes(inp);
        if let Some(m) = marker {
            scene.marker_overlay(m, inp.theme);
        }
        if inp.zoomed {
            scene.reset_overlay(inp.theme);
        }
        scene
    }

    pub fn items(&self) -> &[Item] { &self.items }
    pub fn points(&self) -> &[PointHit] { &self.points }
    pub fn reset_control(&self) -> Option<RectF32> { self.reset_control }
    /// Where the marker dot was drawn, when it is in view.
    pub fn marker_anchor(&self) -> Option<Point> { self.marker_anchor }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |i| i.layer == layer)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.items.iter().any(|i| i.class == class)
    }

    /// Distinct layers in emission order.
    pub fn layers(&self) -> Vec<Layer> {
        let mut out: Vec<Layer> = Vec::new();
        for item in &self.items {
            if out.last() != Some(&item.layer) {
                out.push(item.layer);
            }
        }
        out
    }

    /// Nearest drawn data point within the hit radius.
    pub fn hit_point(&self, x: f32, y: f32) -> Option<usize> {
        let r2 = self.hit_radius * self.hit_radius;
        self.points
            .iter()
            .map(|p| (p, (p.x - x).powi(2) + (p.y - y).powi(2)))
            .filter(|(_, d2)| *d2 <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p.index)
    }

    pub fn hits_reset(&self, x: f32, y: f32) -> bool {
        self.reset_control.is_some_and(|r| r.contains(x, y))
    }

    fn push(&mut self, layer: Layer, class: &'static str, primitive: Primitive) {
        self.items.push(Item { layer, class, primitive });
    }

    fn bands(&mut self, inp: &SceneInputs<'_>) {
        let v = &inp.scales.value;
        for band in &inp.dataset.bands {
            if band.upper_bound < v.vmin || band.lower_bound > v.vmax {
                continue;
            }
            let y1 = v.to_px(band.upper_bound.min(v.vmax));
            let y2 = v.to_px(band.lower_bound.max(v.vmin));
            let rect = RectF32::from_ltrb(self.plot.left, y1, self.plot.right, y2);
            self.push(
                Layer::Bands,
                "mmr-rank-band",
                Primitive::Rect { rect, fill: band.color, stroke: None, corner_radius: 0.0 },
            );
            self.push(
                Layer::Bands,
                "mmr-rank-label",
                Primitive::Text {
                    at: (self.plot.left + 8.0, (y1 + y2) / 2.0 + 4.0),
                    text: band.label.clone(),
                    size: LABEL_SIZE,
                    color: inp.theme.band_label,
                    anchor: TextAnchor::Start,
                },
            );
        }
    }

    fn grid(&mut self, inp: &SceneInputs<'_>) {
        let v = &inp.scales.value;
        let stroke = Stroke::solid(inp.theme.grid, 1.0);
        for value in value_ticks(v.vmin, v.vmax, inp.config.grid_value_step) {
            let y = v.to_px(value);
            self.push(
                Layer::Grid,
                "mmr-grid-line",
                Primitive::Line { from: (self.plot.left, y), to: (self.plot.right, y), stroke },
            );
        }
        for t in month_starts(inp.window.start, inp.window.end) {
            let x = inp.scales.time.to_px(t);
            self.push(
                Layer::Grid,
                "mmr-grid-line",
                Primitive::Line { from: (x, self.plot.top), to: (x, self.plot.bottom), stroke },
            );
        }
    }

    fn marker_background(&mut self, m: &Marker, scales: &Scales) {
        let x = scales.time.to_px(m.timestamp);
        let y = scales.value.to_px(m.value);
        let bottom = self.plot.bottom;
        self.push(
            Layer::MarkerBackground,
            "controller-vertical-line-glow",
            Primitive::Line { from: (x, bottom), to: (x, y), stroke: Stroke::solid(with_alpha(m.color, 0.2), 6.0) },
        );
        self.push(
            Layer::MarkerBackground,
            "controller-vertical-line",
            Primitive::Line {
                from: (x, bottom),
                to: (x, y),
                stroke: Stroke { color: with_alpha(m.color, 0.8), width: 2.0, dash: Some([6.0, 4.0]) },
            },
        );
        self.marker_anchor = Some((x, y));
    }

    fn line(&mut self, inp: &SceneInputs<'_>) {
        let samples = inp.dataset.samples.as_slice();
        if samples.len() < 2 {
            return;
        }
        // One neighbour on each side so the segments reach the plot edges.
        let lo = inp.dataset.samples.lower_bound(inp.window.start).saturating_sub(1);
        let hi = (inp.dataset.samples.upper_bound(inp.window.end) + 1).min(samples.len());
        let points: Vec<Point> = samples[lo..hi]
            .iter()
            .map(|s| (inp.scales.time.to_px(s.timestamp), inp.scales.value.to_px(s.value)))
            .collect();
        if points.len() < 2 {
            return;
        }
        self.push(
            Layer::Line,
            "mmr-line-glow",
            Primitive::Polyline { points: points.clone(), stroke: Stroke::solid(inp.theme.line_glow, 8.0), clip: self.plot },
        );
        self.push(
            Layer::Line,
            "mmr-line",
            Primitive::Polyline { points, stroke: Stroke::solid(inp.theme.line_stroke, 2.5), clip: self.plot },
        );
    }

    fn data_points(&mut self, inp: &SceneInputs<'_>) {
        let set = &inp.dataset.samples;
        let lo = set.lower_bound(inp.window.start);
        let hi = set.upper_bound(inp.window.end).max(lo);
        for index in lo..hi {
            let Some(s) = set.get(index) else { continue };
            let x = inp.scales.time.to_px(s.timestamp);
            let y = inp.scales.value.to_px(s.value);
            self.push(
                Layer::Points,
                "mmr-data-point",
                Primitive::Circle {
                    center: (x, y),
                    radius: inp.config.point_radius,
                    fill: inp.theme.point_fill,
                    stroke: Some(Stroke::solid(inp.theme.point_stroke, 2.0)),
                },
            );
            self.points.push(PointHit { index, x, y });
        }
    }

    fn marker_foreground(&mut self, m: &Marker, scales: &Scales, theme: &Theme) {
        let center = (scales.time.to_px(m.timestamp), scales.value.to_px(m.value));
        self.push(
            Layer::MarkerForeground,
            "controller-dot-glow",
            Primitive::Circle { center, radius: 12.0, fill: with_alpha(m.color, 0.3), stroke: None },
        );
        self.push(
            Layer::MarkerForeground,
            "controller-dot",
            Primitive::Circle {
                center,
                radius: 6.0,
                fill: m.color,
                stroke: Some(Stroke::solid(theme.marker_stroke, 2.0)),
            },
        );
    }

    fn axes(&mut self, inp: &SceneInputs<'_>) {
        let v = &inp.scales.value;
        for value in value_ticks(v.vmin, v.vmax, inp.config.label_value_step) {
            self.push(
                Layer::Axes,
                "mmr-axis-label",
                Primitive::Text {
                    at: (self.plot.left - 8.0, v.to_px(value) + 4.0),
                    text: format!("{}", value.round() as i64),
                    size: LABEL_SIZE,
                    color: inp.theme.axis_label,
                    anchor: TextAnchor::End,
                },
            );
        }
        for t in month_starts(inp.window.start, inp.window.end) {
            self.push(
                Layer::Axes,
                "mmr-axis-label",
                Primitive::Text {
                    at: (inp.scales.time.to_px(t), self.plot.bottom + 20.0),
                    text: month_label(t),
                    size: LABEL_SIZE,
                    color: inp.theme.axis_label,
                    anchor: TextAnchor::Middle,
                },
            );
        }
    }

    fn marker_overlay(&mut self, m: &Marker, theme: &Theme) {
        let Some((x, y)) = self.marker_anchor else { return };
        let size = m.image_size;
        let top = y - size - 16.0;
        if let Some(path) = &m.image {
            self.push(
                Layer::Overlay,
                "controller-marker-image",
                Primitive::Image {
                    rect: RectF32::from_ltwh(x - size / 2.0, top, size, size),
                    path: path.clone(),
                    decoded: m.decoded.clone(),
                },
            );
        }
        if !m.label.is_empty() {
            let label_y = if m.image.is_some() { top - 6.0 } else { y - 18.0 };
            self.push(
                Layer::Overlay,
                "controller-marker-label",
                Primitive::Text { at: (x, label_y), text: m.label.clone(), size: 12.0, color: theme.tooltip_text, anchor: TextAnchor::Middle },
            );
        }
    }

    fn reset_overlay(&mut self, theme: &Theme) {
        let (w, h) = RESET_SIZE;
        let rect = RectF32::from_ltwh(self.plot.right - w - 8.0, self.plot.top + 8.0, w, h);
        self.push(
            Layer::Overlay,
            "mmr-reset-zoom",
            Primitive::Rect {
                rect,
                fill: theme.control_background,
                stroke: Some(Stroke::solid(theme.tooltip_border, 1.0)),
                corner_radius: 4.0,
            },
        );
        self.push(
            Layer::Overlay,
            "mmr-reset-zoom-label",
            Primitive::Text {
                at: ((rect.left + rect.right) / 2.0, rect.top + h / 2.0 + 4.0),
                text: RESET_LABEL.to_string(),
                size: LABEL_SIZE,
                color: theme.control_text,
                anchor: TextAnchor::Middle,
            },
        );
        self.reset_control = Some(rect);
    }

    /// Append the cursor guide, tracker dot and tooltip box for the current
    /// tooltip state. No-op when the tooltip is hidden.
    pub fn push_tooltip(&mut self, tooltip: &Tooltip, reference: f64, theme: &Theme) {
        let (Some(placement), Some(content)) = (tooltip.placement(), tooltip.content(reference)) else {
            return;
        };
        let (x, y) = placement.anchor;
        self.push(
            Layer::Overlay,
            "mmr-cursor-line",
            Primitive::Line {
                from: (x, y),
                to: (x, placement.guide_bottom),
                stroke: Stroke { color: theme.cursor, width: 1.0, dash: Some([4.0, 4.0]) },
            },
        );
        self.push(
            Layer::Overlay,
            "mmr-cursor-tracker",
            Primitive::Circle { center: (x, y), radius: 5.0, fill: theme.line_stroke, stroke: Some(Stroke::solid(theme.point_stroke, 2.0)) },
        );
        let b = placement.bounds;
        self.push(
            Layer::Overlay,
            "mmr-tooltip",
            Primitive::Rect {
                rect: b,
                fill: theme.tooltip_background,
                stroke: Some(Stroke::solid(theme.tooltip_border, 1.0)),
                corner_radius: 8.0,
            },
        );
        let lines = content.lines();
        let delta_line = 3;
        for (i, text) in lines.into_iter().enumerate() {
            let color = if i == delta_line {
                if content.is_above_reference() { theme.positive } else { theme.negative }
            } else {
                theme.tooltip_text
            };
            let size = if i == 2 { 16.0 } else { 12.0 };
            self.push(
                Layer::Overlay,
                "mmr-tooltip-text",
                Primitive::Text {
                    at: (b.left + 12.0, b.top + 24.0 + i as f32 * 20.0),
                    text,
                    size,
                    color,
                    anchor: TextAnchor::Start,
                },
            );
        }
    }
}
