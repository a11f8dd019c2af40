//! Canvas module: the raster surface the drawing lives on.
//!
//! This module contains:
//! - [`Canvas`]: RGBA pixel grid with line, fill, blit and crop operations
//! - [`Brush`]: fixed-width round-capped pen
//! - [`Rgba`]: pixel color
//! - [`ImageSink`]: where cropped, PNG-encoded drawings go

mod color;
mod export;
mod raster;

pub use color::Rgba;
pub use export::{encode_png, ExportedImage, ImageSink, MemorySink, PngDirectory};
pub use raster::{Brush, Canvas};
