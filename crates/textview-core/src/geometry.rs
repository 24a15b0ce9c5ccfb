//! Screen geometry primitives shared by every view.
//!
//! All values are in device-independent units (`f32`). The y axis grows downwards.

/// A point in view space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size with no constraint in either direction.
    pub const fn unbounded() -> Self {
        Self {
            width: f32::INFINITY,
            height: f32::INFINITY,
        }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width (never negative for rects produced by layout).
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from origin and size components.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `y` lies inside the half-open vertical band `[y, bottom)`.
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Whether `point` lies inside the rectangle.
    ///
    /// Horizontally the right edge is inclusive so that the caret slot after the last
    /// character of a row can be hit; vertically the band is half-open so that stacked
    /// rows never overlap.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && self.contains_y(point.y)
    }
}

/// Edge insets.
///
/// Chunk views use the left/right insets to account for whitespace that occupies
/// offsets but is excluded from the chunk's measured content width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    /// Left inset.
    pub left: f32,
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
}

impl Insets {
    /// Create insets from all four edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal insets only.
    pub const fn horizontal(left: f32, right: f32) -> Self {
        Self::new(left, 0.0, right, 0.0)
    }

    /// Sum of the left and right insets.
    pub fn width(&self) -> f32 {
        self.left + self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 11.0, 15.0);
        assert_eq!(rect.right(), 21.0);
        assert_eq!(rect.bottom(), 35.0);
        assert_eq!(rect.origin(), Point::new(10.0, 20.0));
        assert_eq!(rect.size(), Size::new(11.0, 15.0));
    }

    #[test]
    fn test_rect_contains_is_half_open_vertically() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(5.0, 10.0)));
        assert!(!rect.contains(Point::new(-0.5, 5.0)));
    }

    #[test]
    fn test_insets_width() {
        assert_eq!(Insets::horizontal(2.0, 3.0).width(), 5.0);
    }
}
