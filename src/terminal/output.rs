//! `OutputBuffer`: one preview frame of ANSI output, flushed in one write.

use crate::canvas::Rgba;
use std::io::Write;

/// Reusable byte buffer for a preview frame.
///
/// Cursor moves, colors and glyphs for every changed cell are appended here
/// and written with a single `write_all`, so a half-drawn frame is never
/// visible.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Buffer with room for `capacity` bytes before it grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Start a new frame, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Bytes queued so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Put `glyph` at zero-based cell (`col`, `row`).
    pub fn cell(&mut self, col: u16, row: u16, glyph: char) {
        // CSI row ; col H is one-based.
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(row) + 1, u32::from(col) + 1);
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
    }

    /// Select true-color ink and paper for the following glyphs.
    pub fn colors(&mut self, ink: Rgba, paper: Rgba) {
        let _ = write!(
            self.data,
            "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
            ink.r, ink.g, ink.b, paper.r, paper.g, paper.b
        );
    }

    /// Reset colors to the terminal default.
    #[inline]
    pub fn reset_colors(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Erase the whole screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Write the frame to `writer` and flush it.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}
