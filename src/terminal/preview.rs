//! Preview: shows the canvas in the terminal as shaded cells.
//!
//! Each terminal cell covers one block of canvas pixels (see
//! [`SurfaceMapping`]). The share of dark pixels in the block picks a shade
//! glyph. Only cells whose shade changed since the last frame are written.

use super::output::OutputBuffer;
use crate::canvas::{Canvas, Rgba};
use crate::layout::SurfaceMapping;
use std::io::{self, Stdout, Write};

/// Glyphs from empty to full coverage.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Pixels darker than this count as ink.
const INK_THRESHOLD: u8 = 128;

/// Something that can show the canvas after it changes.
pub trait Presenter {
    /// Show the current canvas.
    fn present(&mut self, canvas: &Canvas) -> io::Result<()>;
}

/// Presenter that shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _canvas: &Canvas) -> io::Result<()> {
        Ok(())
    }
}

/// Terminal presenter writing shaded cells to any writer.
pub struct TerminalPreview<W: Write = Stdout> {
    mapping: SurfaceMapping,
    out: OutputBuffer,
    writer: W,
    /// Shade index per cell from the previous frame.
    shown: Vec<u8>,
    ink: Rgba,
    paper: Rgba,
}

impl TerminalPreview<Stdout> {
    /// Preview on stdout.
    pub fn stdout(mapping: SurfaceMapping) -> Self {
        Self::new(mapping, io::stdout())
    }
}

impl<W: Write> TerminalPreview<W> {
    /// Preview into `writer`.
    pub fn new(mapping: SurfaceMapping, writer: W) -> Self {
        Self {
            mapping,
            out: OutputBuffer::with_capacity(16 * 1024),
            writer,
            shown: Vec::new(),
            ink: Rgba::BLACK,
            paper: Rgba::WHITE,
        }
    }

    /// Shade index (0..SHADES.len()) for one cell.
    fn shade_at(&self, canvas: &Canvas, col: u16, row: u16) -> u8 {
        let rect = self.mapping.cell_rect(col, row).clip_to(canvas.width(), canvas.height());
        if rect.is_empty() {
            return 0;
        }
        let dark = canvas.dark_pixels(rect, INK_THRESHOLD) as u64;
        let levels = (SHADES.len() - 1) as u64;
        // Any ink at all shows at least the lightest shade.
        (dark * levels).div_ceil(rect.area()).min(levels) as u8
    }

    /// Consume the preview and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for TerminalPreview<W> {
    fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        let (cols, rows) = self.mapping.grid_size(canvas.width(), canvas.height());
        let cells = usize::from(cols) * usize::from(rows);

        self.out.clear();
        let full_redraw = self.shown.len() != cells;
        if full_redraw {
            self.shown = vec![u8::MAX; cells];
            self.out.clear_screen();
        }
        self.out.colors(self.ink, self.paper);

        let mut changed = 0usize;
        for row in 0..rows {
            for col in 0..cols {
                let shade = self.shade_at(canvas, col, row);
                let idx = usize::from(row) * usize::from(cols) + usize::from(col);
                if self.shown[idx] == shade {
                    continue;
                }
                self.shown[idx] = shade;
                self.out.cell(
                    self.mapping.origin_col.saturating_add(col),
                    self.mapping.origin_row.saturating_add(row),
                    SHADES[usize::from(shade)],
                );
                changed += 1;
            }
        }
        self.out.reset_colors();

        if changed > 0 || full_redraw {
            log::trace!("preview: {changed} cell(s) changed");
            self.out.flush_to(&mut self.writer)?;
        }
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for TerminalPreview<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalPreview")
            .field("mapping", &self.mapping)
            .field("cells", &self.shown.len())
            .finish_non_exhaustive()
    }
}
