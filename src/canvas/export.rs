//! Export: encode cropped drawings as PNG and hand them to a sink.

use super::raster::Canvas;
use crate::error::Result;
use crate::layout::Rect;
use std::fs;
use std::path::{Path, PathBuf};

/// Encode a canvas as an 8-bit RGBA PNG.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&canvas.to_rgba_bytes())?;
        writer.finish()?;
    }
    Ok(bytes)
}

/// A finished, cropped drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Round number within the session, starting at 1.
    pub round: u32,
    /// Crop rectangle on the source canvas.
    pub rect: Rect,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// Crop `canvas` to `rect` and encode it. `None` if the crop is empty.
    pub fn capture(canvas: &Canvas, rect: Rect, round: u32) -> Result<Option<Self>> {
        let Some(cropped) = canvas.crop(rect) else {
            return Ok(None);
        };
        let png = encode_png(&cropped)?;
        Ok(Some(Self {
            round,
            rect: Rect::new(rect.x, rect.y, cropped.width(), cropped.height()),
            png,
        }))
    }
}

/// Receives each completed drawing.
pub trait ImageSink {
    /// Accept one exported image.
    fn accept(&mut self, image: &ExportedImage) -> Result<()>;
}

/// Sink that writes `sketch-NNNN.png` files into a directory.
#[derive(Debug, Clone)]
pub struct PngDirectory {
    dir: PathBuf,
}

impl PngDirectory {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path an image for `round` is written to.
    pub fn path_for(&self, round: u32) -> PathBuf {
        self.dir.join(format!("sketch-{round:04}.png"))
    }
}

impl ImageSink for PngDirectory {
    fn accept(&mut self, image: &ExportedImage) -> Result<()> {
        let path = self.path_for(image.round);
        fs::write(&path, &image.png)?;
        log::info!("wrote {} ({:?})", path.display(), image.rect);
        Ok(())
    }
}

/// Sink that keeps images in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Images in the order they were accepted.
    pub images: Vec<ExportedImage>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageSink for MemorySink {
    fn accept(&mut self, image: &ExportedImage) -> Result<()> {
        self.images.push(image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgba;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_encode_png_header() {
        let canvas = Canvas::new(4, 3, Rgba::WHITE);
        let bytes = encode_png(&canvas).unwrap();
        assert_eq!(bytes[..8], PNG_MAGIC);
        // IHDR width and height, big endian.
        assert_eq!(bytes[16..20], 4u32.to_be_bytes());
        assert_eq!(bytes[20..24], 3u32.to_be_bytes());
    }

    #[test]
    fn test_capture_clipped() {
        let canvas = Canvas::new(50, 50, Rgba::WHITE);
        let image = ExportedImage::capture(&canvas, Rect::new(40, 45, 20, 20), 1)
            .unwrap()
            .unwrap();
        assert_eq!(image.rect, Rect::new(40, 45, 10, 5));
        assert!(ExportedImage::capture(&canvas, Rect::ZERO, 2).unwrap().is_none());
    }

    #[test]
    fn test_png_directory() {
        let dir = std::env::temp_dir().join(format!("sketchflow-export-{}", std::process::id()));
        let mut sink = PngDirectory::new(&dir).unwrap();
        let canvas = Canvas::new(8, 8, Rgba::WHITE);
        let image = ExportedImage::capture(&canvas, canvas.bounds(), 3).unwrap().unwrap();

        sink.accept(&image).unwrap();
        let written = fs::read(sink.path_for(3)).unwrap();
        assert_eq!(written, image.png);

        let _ = fs::remove_dir_all(&dir);
    }
}
