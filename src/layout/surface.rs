//! Mapping between terminal cells and canvas pixels.

use super::Rect;
use crate::stroke::Point;

/// How the canvas is laid over the terminal grid.
///
/// Each terminal cell covers a `cell_width` x `cell_height` block of canvas
/// pixels, starting at cell (`origin_col`, `origin_row`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    /// Column of the canvas' top-left cell.
    pub origin_col: u16,
    /// Row of the canvas' top-left cell.
    pub origin_row: u16,
    /// Canvas pixels per cell, horizontally.
    pub cell_width: f32,
    /// Canvas pixels per cell, vertically.
    pub cell_height: f32,
}

impl Default for SurfaceMapping {
    fn default() -> Self {
        Self {
            origin_col: 0,
            origin_row: 0,
            cell_width: 10.0,
            cell_height: 20.0,
        }
    }
}

impl SurfaceMapping {
    /// Canvas position at the center of a terminal cell, relative to the
    /// surface. Cells left of or above the origin map to negative positions.
    pub fn to_canvas(&self, col: u16, row: u16) -> Point {
        let dx = f32::from(col) - f32::from(self.origin_col);
        let dy = f32::from(row) - f32::from(self.origin_row);
        Point::new(
            (dx + 0.5) * self.cell_width,
            (dy + 0.5) * self.cell_height,
        )
    }

    /// Canvas pixels covered by the cell at grid offset (`col`, `row`).
    pub fn cell_rect(&self, col: u16, row: u16) -> Rect {
        let x = (f32::from(col) * self.cell_width).floor() as u32;
        let y = (f32::from(row) * self.cell_height).floor() as u32;
        let right = (f32::from(col + 1) * self.cell_width).floor() as u32;
        let bottom = (f32::from(row + 1) * self.cell_height).floor() as u32;
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Number of cells needed to show a canvas of the given size.
    pub fn grid_size(&self, canvas_width: u32, canvas_height: u32) -> (u16, u16) {
        let cols = (canvas_width as f32 / self.cell_width).ceil();
        let rows = (canvas_height as f32 / self.cell_height).ceil();
        (cols.min(f32::from(u16::MAX)) as u16, rows.min(f32::from(u16::MAX)) as u16)
    }
}
