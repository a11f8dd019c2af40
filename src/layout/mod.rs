//! Layout module: canvas geometry.
//!
//! - [`Rect`]: integer pixel rectangle used for crops and fills
//! - [`BoundingBox`]: running bounds of a generation pass
//! - [`CropBox`]: the padded square crop before it is fitted to the canvas
//! - [`SurfaceMapping`]: terminal cell <-> canvas pixel conversion

mod bounds;
mod rect;
mod surface;

pub use bounds::{BoundingBox, CropBox, CROP_PADDING};
pub use rect::Rect;
pub use surface::SurfaceMapping;
