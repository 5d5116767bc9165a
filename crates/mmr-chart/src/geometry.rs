// File: crates/mmr-chart/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

use crate::types::{Insets, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF32 {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF32 {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }

    /// Plot area of a container once paddings are removed. May be empty or
    /// inverted for tiny containers; check [`RectF32::is_empty`].
    pub fn plot_area(size: Size, insets: &Insets) -> Self {
        Self::from_ltrb(
            insets.left as f32,
            insets.top as f32,
            size.width - insets.right as f32,
            size.height - insets.bottom as f32,
        )
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}
