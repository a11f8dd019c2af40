//! Message types exchanged between the actors and the session driver.

use crate::stroke::Point;
use bitflags::bitflags;
use std::time::Duration;

/// Kind of pointer event delivered by the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Mouse moved (with or without a button held).
    MouseMove,
    /// Finger touched the surface.
    TouchStart,
    /// Finger moved on the surface.
    TouchMove,
    /// Finger lifted.
    TouchEnd,
}

impl PointerKind {
    /// Whether this kind starts a drawing gesture.
    #[inline]
    pub const fn is_press(self) -> bool {
        matches!(self, Self::MouseDown | Self::TouchStart)
    }

    /// Whether this kind continues a drawing gesture.
    #[inline]
    pub const fn is_motion(self) -> bool {
        matches!(self, Self::MouseMove | Self::TouchMove)
    }

    /// The mask bit that lets this kind through.
    pub const fn mask(self) -> EventMask {
        match self {
            Self::MouseDown | Self::TouchStart => EventMask::PRESS,
            Self::MouseMove | Self::TouchMove => EventMask::MOTION,
            Self::MouseUp | Self::TouchEnd => EventMask::RELEASE,
        }
    }
}

bitflags! {
    /// Which pointer event kinds an input adapter forwards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        /// Press variants (mouse down, touch start).
        const PRESS = 1 << 0;
        /// Motion variants (mouse move, touch move).
        const MOTION = 1 << 1;
        /// Release variants (mouse up, touch end).
        const RELEASE = 1 << 2;
        /// Everything.
        const ALL = Self::PRESS.bits() | Self::MOTION.bits() | Self::RELEASE.bits();
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A raw pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event kind.
    pub kind: PointerKind,
    /// Horizontal position relative to the drawing surface.
    pub x: f32,
    /// Vertical position relative to the drawing surface.
    pub y: f32,
}

impl PointerEvent {
    /// Create a new event.
    pub const fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    /// Mouse press at (x, y).
    pub const fn press(x: f32, y: f32) -> Self {
        Self::new(PointerKind::MouseDown, x, y)
    }

    /// Mouse move to (x, y).
    pub const fn motion(x: f32, y: f32) -> Self {
        Self::new(PointerKind::MouseMove, x, y)
    }

    /// Mouse release at (x, y).
    pub const fn release(x: f32, y: f32) -> Self {
        Self::new(PointerKind::MouseUp, x, y)
    }

    /// Event position.
    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A display refresh delivered by the frame pacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the pacer was started.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes() {
        assert!(PointerKind::MouseDown.is_press());
        assert!(PointerKind::TouchStart.is_press());
        assert!(PointerKind::TouchMove.is_motion());
        assert!(!PointerKind::MouseUp.is_motion());
        assert!(!PointerKind::TouchEnd.is_press());
    }

    #[test]
    fn test_mask_bits() {
        assert_eq!(PointerKind::TouchEnd.mask(), EventMask::RELEASE);
        assert!(EventMask::ALL.contains(PointerKind::MouseMove.mask()));
        assert!(!(EventMask::PRESS | EventMask::RELEASE).contains(PointerKind::TouchMove.mask()));
    }
}
