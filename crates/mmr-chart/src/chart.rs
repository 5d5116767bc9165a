// File: crates/mmr-chart/src/chart.rs
// Summary: Chart context (data, viewport, tooltip, scene) and headless rendering using Skia CPU raster surfaces.

use chrono::{DateTime, Utc};
use skia_safe as skia;

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::feed::{self, FeedSource};
use crate::interpolate::{Interpolator, Reading};
use crate::marker::{Marker, MarkerImage};
use crate::scale::{compute_scales, ScaleInputs, Scales};
use crate::scene::{Primitive, Scene, SceneInputs, Stroke};
use crate::series::Dataset;
use crate::text::TextShaper;
use crate::theme::{self, Theme};
use crate::tooltip::Tooltip;
use crate::types::{Insets, Size, HEIGHT, WIDTH};
use crate::view::{ViewWindow, Viewport, ViewportEvent};

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    /// `None` uses the chart's configured padding.
    pub insets: Option<Insets>,
    /// `None` uses the chart's theme.
    pub theme: Option<Theme>,
    /// Text is skipped when false (deterministic output across font setups).
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, insets: None, theme: None, draw_labels: true }
    }
}

/// One interactive chart. Owns its dataset, viewport and tooltip; several
/// charts can coexist.
pub struct Chart {
    dataset: Dataset,
    config: ChartConfig,
    theme: Theme,
    viewport: Viewport,
    tooltip: Tooltip,
    marker: Option<Marker>,
    size: Size,
    pointer: Option<(f32, f32)>,
    scales: Option<Scales>,
    scene: Option<Scene>,
}

impl Chart {
    pub fn new(dataset: Dataset, config: ChartConfig) -> Self {
        let (first, last) = dataset
            .samples
            .time_extent()
            .unwrap_or((DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::UNIX_EPOCH));
        let full = ViewWindow::covering(first, last);
        let marker = config.marker.as_ref().and_then(|m| {
            let interp = Interpolator::new(&dataset.samples, &config.ladder, config.snap_threshold());
            Marker::resolve(m, &config.asset_root, &interp)
        });
        let mut chart = Self {
            theme: theme::find(&config.theme),
            viewport: Viewport::new(full, config.zoom_settings()),
            tooltip: Tooltip::new(config.tooltip),
            marker,
            size: Size::default(),
            pointer: None,
            scales: None,
            scene: None,
            dataset,
            config,
        };
        // A failed first frame is logged; the next resize retries.
        let _ = chart.refresh();
        chart
    }

    /// Load the feed and build a chart. Load failures leave no chart behind.
    pub fn from_source(source: &FeedSource, config: ChartConfig) -> Result<Self> {
        match feed::load(source, &config) {
            Ok(dataset) => Ok(Self::new(dataset, config)),
            Err(e) => {
                log::error!("chart init failed for {source}: {e}");
                Err(e)
            }
        }
    }

    pub fn dataset(&self) -> &Dataset { &self.dataset }
    pub fn config(&self) -> &ChartConfig { &self.config }
    pub fn theme(&self) -> &Theme { &self.theme }
    pub fn viewport(&self) -> &Viewport { &self.viewport }
    pub fn window(&self) -> ViewWindow { self.viewport.window() }
    pub fn tooltip(&self) -> &Tooltip { &self.tooltip }
    pub fn marker(&self) -> Option<&Marker> { self.marker.as_ref() }
    pub fn size(&self) -> Size { self.size }
    /// `None` while the container is not measurable.
    pub fn scales(&self) -> Option<&Scales> { self.scales.as_ref() }
    pub fn scene(&self) -> Option<&Scene> { self.scene.as_ref() }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let _ = self.refresh();
    }

    pub fn interpolator(&self) -> Interpolator<'_> {
        Interpolator::new(&self.dataset.samples, &self.config.ladder, self.config.snap_threshold())
    }

    pub fn value_at(&self, t: DateTime<Utc>) -> Reading {
        self.interpolator().value_at(t)
    }

    /// Recompute scales and rebuild the scene for the current window and size.
    pub fn refresh(&mut self) -> Result<()> {
        match self.scales_for(self.size, &self.config.padding) {
            Ok(scales) => {
                let scene = Scene::build(&self.scene_inputs(&scales, &self.theme));
                self.scales = Some(scales);
                self.scene = Some(scene);
                Ok(())
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                self.scales = None;
                self.scene = None;
                self.tooltip.hide();
                Err(e)
            }
        }
    }

    /// New container size. Geometry only; the window is kept.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        log::debug!("resize to {}x{}", size.width, size.height);
        self.size = size;
        self.tooltip.hide();
        self.refresh()
    }

    pub fn on_wheel(&mut self, x: f32, y: f32, delta_y: f32) -> bool {
        self.apply(ViewportEvent::Wheel { x, y, delta_y })
    }

    /// Starts a pan unless the press lands on the reset control.
    pub fn on_pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.scene.as_ref().is_some_and(|s| s.hits_reset(x, y)) {
            return false;
        }
        self.apply(ViewportEvent::PointerDown { x, y })
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.pointer = Some((x, y));
        let changed = self.apply(ViewportEvent::PointerMove { x, y });
        if !changed {
            self.track_pointer();
        }
        changed
    }

    /// Ends a pan wherever the pointer is, even with no measurable container.
    pub fn on_pointer_up(&mut self) {
        self.viewport.release();
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
        self.tooltip.hide();
    }

    /// Click: the reset control resets the zoom; a data point pins the
    /// tooltip to that sample. Returns the pinned sample index.
    pub fn on_click(&mut self, x: f32, y: f32) -> Option<usize> {
        let scene = self.scene.as_ref()?;
        if scene.hits_reset(x, y) {
            self.reset_zoom();
            return None;
        }
        let index = scene.hit_point(x, y)?;
        let scales = self.scales?;
        let sample = self.dataset.samples.get(index)?;
        self.tooltip.pin(index, sample, &scales);
        Some(index)
    }

    /// Back to the full range. Applies even while frames are skipped.
    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.viewport.reset();
        if changed {
            self.window_changed();
        }
        changed
    }

    /// Geometry-dependent events (wheel, press, drag) need the current scales.
    fn apply(&mut self, event: ViewportEvent) -> bool {
        let Some(scales) = self.scales else { return false };
        let changed = self.viewport.handle(event, &scales);
        if changed {
            self.window_changed();
        }
        changed
    }

    fn window_changed(&mut self) {
        if self.size.is_measurable() {
            let _ = self.refresh();
            self.track_pointer();
        }
    }

    fn track_pointer(&mut self) {
        let (Some((x, _)), Some(scales)) = (self.pointer, self.scales) else {
            return;
        };
        let interp = Interpolator::new(&self.dataset.samples, &self.config.ladder, self.config.snap_threshold());
        self.tooltip.pointer_move(x, &scales, &interp);
    }

    fn scales_for(&self, size: Size, insets: &Insets) -> Result<Scales> {
        let window = self.viewport.window();
        compute_scales(&ScaleInputs {
            window,
            size,
            insets,
            visible: self.dataset.samples.in_range(window.start, window.end),
            all: self.dataset.samples.as_slice(),
            value_padding: self.config.value_padding,
        })
    }

    fn scene_inputs<'a>(&'a self, scales: &'a Scales, theme: &'a Theme) -> SceneInputs<'a> {
        SceneInputs {
            dataset: &self.dataset,
            scales,
            window: self.viewport.window(),
            marker: self.marker.as_ref(),
            theme,
            config: &self.config,
            zoomed: self.viewport.is_zoomed(),
        }
    }

    /// Current scene plus the tooltip overlay.
    pub fn frame(&self) -> Option<Scene> {
        let mut scene = self.scene.clone()?;
        scene.push_tooltip(&self.tooltip, self.dataset.reference_threshold, &self.theme);
        Some(scene)
    }

    /// Options matching the live container.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.size.width.round() as i32,
            height: self.size.height.round() as i32,
            ..RenderOptions::default()
        }
    }

    fn frame_for(&self, opts: &RenderOptions) -> Result<Scene> {
        let size = Size::new(opts.width as f32, opts.height as f32);
        let insets = opts.insets.unwrap_or(self.config.padding);
        let theme = opts.theme.unwrap_or(self.theme);
        let live = size == self.size && insets == self.config.padding && theme.name == self.theme.name;
        if live {
            if let Some(scene) = self.frame() {
                return Ok(scene);
            }
        }
        let scales = self.scales_for(size, &insets)?;
        Ok(Scene::build(&self.scene_inputs(&scales, &theme)))
    }

    fn render_surface(&self, opts: &RenderOptions) -> Result<skia::Surface> {
        let scene = self.frame_for(opts)?;
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or(ChartError::Backend("failed to create raster surface"))?;
        let shaper = opts.draw_labels.then(TextShaper::new);
        draw_scene(surface.canvas(), &scene, shaper.as_ref());
        Ok(surface)
    }

    /// Render the chart to a PNG at `output_png_path` using a CPU raster surface.
    pub fn render_to_png(&self, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(opts)?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, bytes)?;
        Ok(())
    }

    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = self.render_surface(opts)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or(ChartError::Backend("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Unpremultiplied RGBA8 pixels, returned as `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = self.render_surface(opts)?;
        let (w, h) = (opts.width.max(0) as u32, opts.height.max(0) as u32);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        let info = skia::ImageInfo::new(
            (opts.width, opts.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let image = surface.image_snapshot();
        if !image.read_pixels(&info, &mut pixels, row_bytes, (0, 0), skia::image::CachingHint::Allow) {
            return Err(ChartError::Backend("read pixels failed"));
        }
        Ok((pixels, w, h, row_bytes))
    }
}

// ---- raster backend ---------------------------------------------------------

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

fn stroke_paint(stroke: &Stroke) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(stroke.width);
    paint.set_color(stroke.color);
    if let Some(intervals) = stroke.dash {
        paint.set_path_effect(skia::PathEffect::dash(&intervals, 0.0));
    }
    paint
}

fn to_rect(r: &crate::geometry::RectF32) -> skia::Rect {
    skia::Rect::from_ltrb(r.left, r.top, r.right, r.bottom)
}

/// Paint a scene onto a canvas. Text is skipped without a shaper.
pub fn draw_scene(canvas: &skia::Canvas, scene: &Scene, shaper: Option<&TextShaper>) {
    canvas.clear(scene.background);
    for item in scene.items() {
        match &item.primitive {
            Primitive::Rect { rect, fill, stroke, corner_radius } => {
                let r = to_rect(rect);
                let fill = fill_paint(*fill);
                if *corner_radius > 0.0 {
                    canvas.draw_round_rect(r, *corner_radius, *corner_radius, &fill);
                } else {
                    canvas.draw_rect(r, &fill);
                }
                if let Some(s) = stroke {
                    canvas.draw_round_rect(r, *corner_radius, *corner_radius, &stroke_paint(s));
                }
            }
            Primitive::Line { from, to, stroke } => {
                canvas.draw_line(*from, *to, &stroke_paint(stroke));
            }
            Primitive::Polyline { points, stroke, clip } => {
                let Some((&first, rest)) = points.split_first() else { continue };
                let mut path = skia::Path::new();
                path.move_to(first);
                for &p in rest {
                    path.line_to(p);
                }
                let mut paint = stroke_paint(stroke);
                paint.set_stroke_join(skia::paint::Join::Round);
                paint.set_stroke_cap(skia::paint::Cap::Round);
                canvas.save();
                canvas.clip_rect(to_rect(clip), None, Some(true));
                canvas.draw_path(&path, &paint);
                canvas.restore();
            }
            Primitive::Circle { center, radius, fill, stroke } => {
                canvas.draw_circle(*center, *radius, &fill_paint(*fill));
                if let Some(s) = stroke {
                    canvas.draw_circle(*center, *radius, &stroke_paint(s));
                }
            }
            Primitive::Text { at, text, size, color, anchor } => {
                if let Some(shaper) = shaper {
                    shaper.draw(canvas, text, *at, *size, *color, *anchor);
                }
            }
            Primitive::Image { rect, decoded, .. } => {
                if let Some(MarkerImage(image)) = decoded {
                    canvas.draw_image_rect(image, None, to_rect(rect), &fill_paint(skia::Color::WHITE));
                }
            }
        }
    }
}
