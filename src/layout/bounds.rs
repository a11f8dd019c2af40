//! Running bounding box of a generation pass and the square crop derived from it.

use super::Rect;
use crate::stroke::Point;

/// Padding added on each side of the visited area.
pub const CROP_PADDING: f32 = 5.0;

/// Axis-aligned box accumulated over visited pen positions.
///
/// Bounds only ever widen: `min_*` never increases and `max_*` never
/// decreases. The box has no meaning until at least one position is visited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    visited: usize,
}

impl BoundingBox {
    /// An empty box.
    pub const fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
            visited: 0,
        }
    }

    /// Forget everything visited so far.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Widen the box to include `p`.
    pub fn visit(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
        self.visited += 1;
    }

    /// Whether at least one position was visited.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.visited > 0
    }

    /// Number of positions visited.
    #[inline]
    pub const fn visited(&self) -> usize {
        self.visited
    }

    /// Smallest visited x.
    #[inline]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Smallest visited y.
    #[inline]
    pub const fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Largest visited x.
    #[inline]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Largest visited y.
    #[inline]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Padded square crop around the visited area.
    ///
    /// Width and height both equal the larger padded span, so exported
    /// thumbnails are always square before clamping.
    pub fn square_crop(&self) -> Option<CropBox> {
        if !self.is_valid() {
            return None;
        }
        let span_x = self.max_x - self.min_x + 2.0 * CROP_PADDING;
        let span_y = self.max_y - self.min_y + 2.0 * CROP_PADDING;
        let side = span_x.max(span_y);
        Some(CropBox {
            left: self.min_x - CROP_PADDING,
            top: self.min_y - CROP_PADDING,
            width: side,
            height: side,
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Unclamped crop region in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    /// Left edge, may be negative.
    pub left: f32,
    /// Top edge, may be negative.
    pub top: f32,
    /// Width before clamping.
    pub width: f32,
    /// Height before clamping.
    pub height: f32,
}

impl CropBox {
    /// Fit the crop onto a `canvas_width` x `canvas_height` surface.
    ///
    /// Edges snap outward to whole pixels: the size spans from
    /// `floor(left)` to `ceil(left + width)`, so a fractional origin never
    /// cuts off the far edge. The origin is then clamped to be non-negative
    /// (keeping that size) and the size trimmed to the canvas.
    pub fn clamp_to(&self, canvas_width: u32, canvas_height: u32) -> Rect {
        let (x, width) = snap_span(self.left, self.width, canvas_width);
        let (y, height) = snap_span(self.top, self.height, canvas_height);
        Rect::new(x, y, width, height)
    }
}

/// Whole-pixel origin and length covering `start..start + len` on an axis of
/// `limit` pixels.
fn snap_span(start: f32, len: f32, limit: u32) -> (u32, u32) {
    let first = start.floor();
    let span = ((start + len.max(0.0)).ceil() - first).max(0.0);
    let origin = (first.max(0.0) as u32).min(limit);
    (origin, (span as u32).min(limit - origin))
}
