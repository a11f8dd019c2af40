//! Stroke: the relative pen movement produced by the model or the user.

/// Pen state attached to a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pen {
    /// Draw a line segment to the new position.
    #[default]
    Down,
    /// Move without drawing.
    Up,
    /// End of sequence. Never drawn.
    End,
}

/// An absolute pen position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position in canvas pixels.
    pub x: f32,
    /// Vertical position in canvas pixels.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The position reached after applying a stroke's delta.
    #[inline]
    #[must_use]
    pub fn offset(self, stroke: Stroke) -> Self {
        Self::new(self.x + stroke.dx, self.y + stroke.dy)
    }
}

/// A relative pen movement plus pen state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stroke {
    /// Horizontal delta.
    pub dx: f32,
    /// Vertical delta.
    pub dy: f32,
    /// Pen state for this movement.
    pub pen: Pen,
}

impl Stroke {
    /// Create a new stroke.
    #[inline]
    pub const fn new(dx: f32, dy: f32, pen: Pen) -> Self {
        Self { dx, dy, pen }
    }

    /// A visible movement.
    #[inline]
    pub const fn down(dx: f32, dy: f32) -> Self {
        Self::new(dx, dy, Pen::Down)
    }

    /// An invisible movement.
    #[inline]
    pub const fn up(dx: f32, dy: f32) -> Self {
        Self::new(dx, dy, Pen::Up)
    }

    /// The end-of-sequence marker.
    #[inline]
    pub const fn end() -> Self {
        Self::new(0.0, 0.0, Pen::End)
    }

    /// Pen-down stroke covering the motion from `from` to `to`.
    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        Self::down(to.x - from.x, to.y - from.y)
    }

    /// Whether this stroke terminates the sequence.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pen == Pen::End
    }

    /// Whether this stroke leaves ink on the canvas.
    #[inline]
    pub fn is_drawn(&self) -> bool {
        self.pen == Pen::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_is_delta() {
        let stroke = Stroke::between(Point::new(10.0, 10.0), Point::new(20.0, 5.0));
        assert_eq!(stroke, Stroke::down(10.0, -5.0));
    }

    #[test]
    fn test_offset() {
        let p = Point::new(300.0, 300.0).offset(Stroke::up(-2.0, 3.0));
        assert_eq!(p, Point::new(298.0, 303.0));
    }

    #[test]
    fn test_pen_predicates() {
        assert!(Stroke::end().is_end());
        assert!(!Stroke::end().is_drawn());
        assert!(Stroke::down(1.0, 1.0).is_drawn());
        assert!(!Stroke::up(1.0, 1.0).is_drawn());
    }
}
