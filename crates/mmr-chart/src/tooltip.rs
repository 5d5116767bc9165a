// File: crates/mmr-chart/src/tooltip.rs
// Summary: Hover/pin tooltip state, content formatting and placement inside the container.

use crate::axis::{rating_label, signed_delta, tooltip_date};
use crate::config::TooltipSize;
use crate::geometry::RectF32;
use crate::interpolate::{Interpolator, Reading};
use crate::scale::Scales;
use crate::series::Sample;
use crate::types::Size;

/// Horizontal gap between the anchor and the box.
const OFFSET_X: f32 = 20.0;
/// Minimum distance kept from the container edges.
const EDGE_MARGIN: f32 = 10.0;

/// Text shown in the tooltip box.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
    pub date: String,
    pub rank: String,
    pub division: String,
    pub rating: String,
    /// Rounded distance to the reference threshold.
    pub delta: i64,
    pub delta_label: String,
    pub estimated: bool,
}

impl TooltipContent {
    pub fn from_reading(reading: &Reading, reference: f64) -> Self {
        let delta = (reading.value - reference).round() as i64;
        Self {
            date: tooltip_date(reading.timestamp),
            rank: reading.category_label.clone(),
            division: reading.sub_bucket.clone(),
            rating: rating_label(reading.value),
            delta,
            delta_label: signed_delta(delta),
            estimated: !reading.exact,
        }
    }

    pub fn is_above_reference(&self) -> bool {
        self.delta >= 0
    }

    /// Lines in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            self.date.clone(),
            format!("{} {}", self.rank, self.division),
            format!("{} MMR", self.rating),
            format!("{} from GC1", self.delta_label),
        ];
        if self.estimated {
            out.push("(Estimated from interpolation)".to_string());
        }
        out
    }
}

/// Where the tooltip and its cursor guide go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Point on the line the tooltip describes.
    pub anchor: (f32, f32),
    pub bounds: RectF32,
    /// Bottom end of the vertical guide (plot bottom).
    pub guide_bottom: f32,
}

/// Box to the right of the anchor, flipped left when it would leave the
/// container, vertically centred. The bottom margin wins over the top one
/// when the container is shorter than the box.
pub fn place(anchor: (f32, f32), size: TooltipSize, container: Size, guide_bottom: f32) -> Placement {
    let (x, y) = anchor;
    let mut left = x + OFFSET_X;
    if left + size.width > container.width - EDGE_MARGIN {
        left = x - size.width - OFFSET_X;
    }
    let mut top = (y - size.height / 2.0).max(EDGE_MARGIN);
    if top + size.height > container.height - EDGE_MARGIN {
        top = container.height - size.height - EDGE_MARGIN;
    }
    Placement { anchor, bounds: RectF32::from_ltwh(left, top, size.width, size.height), guide_bottom }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TooltipState {
    Hidden,
    /// Follows the pointer; may be interpolated.
    Hover { reading: Reading, placement: Placement },
    /// Locked to one sample until the pointer moves again.
    Pinned { index: usize, reading: Reading, placement: Placement },
}

#[derive(Clone, Debug)]
pub struct Tooltip {
    state: TooltipState,
    size: TooltipSize,
}

impl Tooltip {
    pub fn new(size: TooltipSize) -> Self {
        Self { state: TooltipState::Hidden, size }
    }

    pub fn state(&self) -> &TooltipState { &self.state }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, TooltipState::Hidden)
    }

    pub fn reading(&self) -> Option<&Reading> {
        match &self.state {
            TooltipState::Hidden => None,
            TooltipState::Hover { reading, .. } | TooltipState::Pinned { reading, .. } => Some(reading),
        }
    }

    pub fn placement(&self) -> Option<&Placement> {
        match &self.state {
            TooltipState::Hidden => None,
            TooltipState::Hover { placement, .. } | TooltipState::Pinned { placement, .. } => Some(placement),
        }
    }

    pub fn content(&self, reference: f64) -> Option<TooltipContent> {
        self.reading().map(|r| TooltipContent::from_reading(r, reference))
    }

    pub fn hide(&mut self) {
        self.state = TooltipState::Hidden;
    }

    /// Track the pointer. Hidden whenever `x` is outside the plot horizontally.
    pub fn pointer_move(&mut self, x: f32, scales: &Scales, interp: &Interpolator<'_>) {
        if !scales.plot.contains_x(x) {
            self.hide();
            return;
        }
        let reading = interp.value_at(scales.time.from_px(x));
        let anchor = (x, scales.value.to_px(reading.value));
        let placement = place(anchor, self.size, scales.size, scales.plot.bottom);
        self.state = TooltipState::Hover { reading, placement };
    }

    /// Show the exact sample at `index`.
    pub fn pin(&mut self, index: usize, sample: &Sample, scales: &Scales) {
        let reading = Reading {
            timestamp: sample.timestamp,
            value: sample.value,
            category_label: sample.category_label.clone(),
            sub_bucket: sample.sub_bucket.clone(),
            exact: true,
        };
        let anchor = (scales.time.to_px(sample.timestamp), scales.value.to_px(sample.value));
        let placement = place(anchor, self.size, scales.size, scales.plot.bottom);
        self.state = TooltipState::Pinned { index, reading, placement };
    }
}
