//! Rgba: 8-bit-per-channel color stored in canvas pixels.

/// An RGBA color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0-255)
    pub a: u8,
}

impl Rgba {
    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white, the drawing background.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque black, the default ink.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Light grey used when clearing the drawing.
    pub const PAPER: Self = Self::rgb(0xeb, 0xed, 0xef);

    /// Perceived brightness in 0..=255 (Rec. 601 weights).
    #[inline]
    pub fn luma(&self) -> u8 {
        let y = 299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        (y / 1000) as u8
    }

    /// Channels in RGBA byte order.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl std::fmt::Debug for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<u32> for Rgba {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500), fully opaque.
    #[inline]
    fn from(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}
