// File: crates/mmr-chart/src/view.rs
//! Visible time window and the pan/zoom state machine that owns it.
//!
//! The viewport is a two-state machine, independent of any rendering surface:
//!
//! | State     | Event                 | Guard                         | Effect                                   | Next      |
//! |-----------|-----------------------|-------------------------------|------------------------------------------|-----------|
//! | `Idle`    | `Wheel`               | pointer inside plot           | zoom about the pointed-at timestamp      | `Idle`    |
//! | `Idle`    | `PointerDown`         | inside plot, window < full    | remember pointer x and window            | `Panning` |
//! | `Idle`    | `PointerDown`         | otherwise                     | none                                     | `Idle`    |
//! | `Panning` | `PointerMove`         | none                          | shift origin window by the dragged time  | `Panning` |
//! | `Panning` | `Wheel`               | pointer inside plot           | zoom, then re-anchor the drag origin     | `Panning` |
//! | `Panning` | `PointerUp`           | none (released anywhere)      | none                                     | `Idle`    |
//! | any       | `Reset`               | none                          | window = full range                      | same      |
//!
//! Every resulting window satisfies `full.start <= start < end <= full.end`
//! and `end - start >= min(min_span, full.span)`.

use chrono::{DateTime, Duration, Utc};

use crate::scale::Scales;

/// Visible time range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ViewWindow {
    /// `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Window covering `[start, end]`, widened to one millisecond when the
    /// range is a single instant (a one-sample dataset).
    pub fn covering(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start < end {
            Self { start, end }
        } else {
            Self { start, end: start + Duration::milliseconds(1) }
        }
    }

    fn from_millis(start: i64, end: i64) -> Option<Self> {
        let start = DateTime::<Utc>::from_timestamp_millis(start)?;
        let end = DateTime::<Utc>::from_timestamp_millis(end)?;
        Self::new(start, end)
    }

    pub fn span(&self) -> Duration { self.end - self.start }
    pub fn span_ms(&self) -> i64 { self.span().num_milliseconds() }
    pub fn start_ms(&self) -> i64 { self.start.timestamp_millis() }
    pub fn end_ms(&self) -> i64 { self.end.timestamp_millis() }

    /// Inclusive on both ends.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }

    /// Slide a `[start, start + span)` window inside `full` without resizing it.
    /// A span wider than `full` collapses to `full`.
    fn slid_into(start: i64, span: i64, full: &ViewWindow) -> ViewWindow {
        let full_span = full.span_ms();
        if span >= full_span {
            return *full;
        }
        let start = start.clamp(full.start_ms(), full.end_ms() - span);
        Self::from_millis(start, start + span).unwrap_or(*full)
    }
}

/// Zoom tuning, see `ChartConfig` for defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSettings {
    /// Span multiplier per wheel tick towards the user (< 1).
    pub zoom_in_factor: f64,
    /// Span multiplier per wheel tick away from the user (> 1).
    pub zoom_out_factor: f64,
    pub min_span: Duration,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self { zoom_in_factor: 0.85, zoom_out_factor: 1.15, min_span: Duration::days(14) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportState {
    Idle,
    Panning { origin_x: f32, origin_window: ViewWindow },
}

/// Pointer input in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// `delta_y < 0` zooms in, `delta_y > 0` zooms out (browser wheel convention).
    Wheel { x: f32, y: f32, delta_y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Reset,
}

/// Owner of the visible window.
#[derive(Clone, Debug)]
pub struct Viewport {
    full: ViewWindow,
    window: ViewWindow,
    state: ViewportState,
    settings: ZoomSettings,
}

impl Viewport {
    pub fn new(full: ViewWindow, settings: ZoomSettings) -> Self {
        Self { full, window: full, state: ViewportState::Idle, settings }
    }

    pub fn window(&self) -> ViewWindow { self.window }
    pub fn full(&self) -> ViewWindow { self.full }
    pub fn state(&self) -> ViewportState { self.state }
    pub fn settings(&self) -> &ZoomSettings { &self.settings }

    pub fn is_zoomed(&self) -> bool {
        self.window != self.full
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, ViewportState::Panning { .. })
    }

    /// Smallest span the window may shrink to.
    pub fn min_span_ms(&self) -> i64 {
        self.settings.min_span.num_milliseconds().max(1).min(self.full.span_ms())
    }

    /// Feed one event through the state machine. Returns `true` when the
    /// window changed and the caller must recompute scales and redraw.
    pub fn handle(&mut self, event: ViewportEvent, scales: &Scales) -> bool {
        match event {
            ViewportEvent::Wheel { x, y, delta_y } => {
                if !scales.plot.contains(x, y) || delta_y == 0.0 {
                    return false;
                }
                let changed = self.zoom(x, delta_y, scales);
                if let ViewportState::Panning { .. } = self.state {
                    self.state = ViewportState::Panning { origin_x: x, origin_window: self.window };
                }
                changed
            }
            ViewportEvent::PointerDown { x, y } => {
                if self.is_idle() && scales.plot.contains(x, y) && self.is_zoomed() {
                    self.state = ViewportState::Panning { origin_x: x, origin_window: self.window };
                }
                false
            }
            ViewportEvent::PointerMove { x, .. } => match self.state {
                ViewportState::Panning { origin_x, origin_window } => {
                    self.pan(origin_x, origin_window, x, scales)
                }
                ViewportState::Idle => false,
            },
            ViewportEvent::PointerUp => {
                self.release();
                false
            }
            ViewportEvent::Reset => self.reset(),
        }
    }

    /// End any drag. Needs no geometry, so it also applies while the
    /// container cannot be measured.
    pub fn release(&mut self) {
        self.state = ViewportState::Idle;
    }

    fn is_idle(&self) -> bool {
        self.state == ViewportState::Idle
    }

    /// Restore the full range unconditionally.
    pub fn reset(&mut self) -> bool {
        let changed = self.window != self.full;
        self.window = self.full;
        if let ViewportState::Panning { origin_x, .. } = self.state {
            self.state = ViewportState::Panning { origin_x, origin_window: self.full };
        }
        changed
    }

    /// Scale the span by one wheel tick about the timestamp under `x`, keeping
    /// that timestamp at the same relative position.
    pub fn zoom(&mut self, x: f32, delta_y: f32, scales: &Scales) -> bool {
        let factor = if delta_y < 0.0 { self.settings.zoom_in_factor } else { self.settings.zoom_out_factor };
        let old = self.window;
        let old_span = old.span_ms();
        let full_span = self.full.span_ms();

        let new_span = ((old_span as f64 * factor).round() as i64).clamp(self.min_span_ms(), full_span);
        let anchor = scales.time.from_px_ms(x).clamp(old.start_ms() as f64, old.end_ms() as f64);
        let rel = (anchor - old.start_ms() as f64) / old_span as f64;
        let new_start = (anchor - rel * new_span as f64).round() as i64;

        self.window = ViewWindow::slid_into(new_start, new_span, &self.full);
        let changed = self.window != old;
        if changed {
            log::debug!(
                "zoom x{factor:.2}: {} .. {} ({} h)",
                self.window.start,
                self.window.end,
                self.window.span().num_hours()
            );
        }
        changed
    }

    fn pan(&mut self, origin_x: f32, origin_window: ViewWindow, x: f32, scales: &Scales) -> bool {
        let plot_w = scales.plot.width().max(1.0) as f64;
        let ms_per_px = origin_window.span_ms() as f64 / plot_w;
        let shift = -((x - origin_x) as f64 * ms_per_px).round() as i64;
        let old = self.window;
        self.window = ViewWindow::slid_into(origin_window.start_ms() + shift, origin_window.span_ms(), &self.full);
        self.window != old
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn slide_keeps_span() {
        let full = ViewWindow::new(at(0), at(100)).unwrap();
        let span = Duration::days(10).num_milliseconds();
        let left = ViewWindow::slid_into(at(-5).timestamp_millis(), span, &full);
        assert_eq!((left.start, left.end), (at(0), at(10)));
        let right = ViewWindow::slid_into(at(95).timestamp_millis(), span, &full);
        assert_eq!((right.start, right.end), (at(90), at(100)));
        let wide = ViewWindow::slid_into(at(3).timestamp_millis(), span * 20, &full);
        assert_eq!(wide, full);
    }

    #[test]
    fn covering_widens_single_instant() {
        let w = ViewWindow::covering(at(1), at(1));
        assert_eq!(w.span_ms(), 1);
    }
}
