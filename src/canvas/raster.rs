//! Canvas: an RGBA raster surface with the few drawing operations the
//! session needs.
//!
//! Pixels are stored in a contiguous `Vec` in row-major order:
//! `index = y * width + x`.

use super::color::Rgba;
use crate::layout::Rect;
use crate::stroke::Point;

/// Pen used for every segment: fixed width, color, round caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Line width in pixels.
    pub width: f32,
    /// Ink color.
    pub color: Rgba,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: 10.0,
            color: Rgba::BLACK,
        }
    }
}

/// A raster drawing surface.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgba>,
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        assert!(width > 0 && height > 0, "Canvas dimensions must be non-zero");
        Self {
            pixels: vec![background; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Canvas width.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The whole canvas as a rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Convert (x, y) to a linear index, `None` when out of bounds.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Returns `false` if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    /// Fill the whole canvas.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let rect = rect.clip_to(self.width, self.height);
        for row in rect.y..rect.bottom() {
            let start = (row as usize) * (self.width as usize);
            self.pixels[start + rect.x as usize..start + rect.right() as usize].fill(color);
        }
    }

    /// Draw a straight round-capped segment from `from` to `to`.
    ///
    /// Every pixel whose center lies within `brush.width / 2` of the segment
    /// is painted. A zero-length segment paints a dot.
    pub fn draw_line(&mut self, from: Point, to: Point, brush: &Brush) {
        let radius = brush.width.max(0.0) / 2.0;
        let x0 = (from.x.min(to.x) - radius).floor().max(0.0);
        let y0 = (from.y.min(to.y) - radius).floor().max(0.0);
        let x1 = (from.x.max(to.x) + radius).ceil().min(self.width as f32);
        let y1 = (from.y.max(to.y) + radius).ceil().min(self.height as f32);
        if !(x0 < x1 && y0 < y1) {
            return;
        }

        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len2 = dx.mul_add(dx, dy * dy);
        let r2 = radius * radius;

        for py in (y0 as u32)..(y1 as u32) {
            let cy = py as f32 + 0.5;
            let row = (py as usize) * (self.width as usize);
            for px in (x0 as u32)..(x1 as u32) {
                let cx = px as f32 + 0.5;
                let t = if len2 > 0.0 {
                    ((cx - from.x).mul_add(dx, (cy - from.y) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = cx - t.mul_add(dx, from.x);
                let ey = cy - t.mul_add(dy, from.y);
                if ex.mul_add(ex, ey * ey) <= r2 {
                    self.pixels[row + px as usize] = brush.color;
                }
            }
        }
    }

    /// Copy `source` onto this canvas with its top-left corner at (x, y).
    pub fn draw_canvas(&mut self, source: &Self, x: u32, y: u32) {
        let target = Rect::new(x, y, source.width, source.height).clip_to(self.width, self.height);
        for row in 0..target.height {
            let src = (row as usize) * (source.width as usize);
            let dst = ((target.y + row) as usize) * (self.width as usize) + target.x as usize;
            self.pixels[dst..dst + target.width as usize]
                .copy_from_slice(&source.pixels[src..src + target.width as usize]);
        }
    }

    /// Snapshot of the current pixels.
    pub fn backup(&self) -> Self {
        self.clone()
    }

    /// Paint a snapshot back over the canvas.
    pub fn restore(&mut self, backup: &Self) {
        debug_assert_eq!(self.width, backup.width);
        debug_assert_eq!(self.height, backup.height);
        self.draw_canvas(backup, 0, 0);
    }

    /// Copy of the pixels inside `rect`, or `None` if the clipped
    /// rectangle is empty.
    pub fn crop(&self, rect: Rect) -> Option<Self> {
        let rect = rect.clip_to(self.width, self.height);
        if rect.is_empty() {
            return None;
        }
        let mut pixels = Vec::with_capacity(rect.area() as usize);
        for row in rect.y..rect.bottom() {
            let start = (row as usize) * (self.width as usize);
            pixels.extend_from_slice(&self.pixels[start + rect.x as usize..start + rect.right() as usize]);
        }
        Some(Self {
            pixels,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Count pixels in `rect` darker than `threshold`.
    pub fn dark_pixels(&self, rect: Rect, threshold: u8) -> usize {
        let rect = rect.clip_to(self.width, self.height);
        (rect.y..rect.bottom())
            .map(|row| {
                let start = (row as usize) * (self.width as usize);
                self.pixels[start + rect.x as usize..start + rect.right() as usize]
                    .iter()
                    .filter(|p| p.luma() < threshold)
                    .count()
            })
            .sum()
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Pixels as packed RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
