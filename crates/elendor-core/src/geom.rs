use serde::{Deserialize, Serialize};

/// A point in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `other` by `t` (0.0..=1.0).
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Collision rectangle expressed relative to the sprite's top-left corner.
///
/// Usually covers only the feet so characters can overlap walls with their
/// heads, the way top-down sprites are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    /// Offset from the sprite's left edge.
    pub offset_x: f64,
    /// Offset from the sprite's top edge.
    pub offset_y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl HitBox {
    /// Create a hit box.
    pub const fn new(offset_x: f64, offset_y: f64, width: f64, height: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
        }
    }

    /// Top-left corner of the box for a sprite placed at `origin`.
    pub fn origin_at(&self, origin: Point) -> Point {
        Point::new(origin.x + self.offset_x, origin.y + self.offset_y)
    }

    /// Center of the box for a sprite placed at `origin`.
    pub fn center_at(&self, origin: Point) -> Point {
        let o = self.origin_at(origin);
        Point::new(o.x + self.width / 2.0, o.y + self.height / 2.0)
    }
}

impl Default for HitBox {
    fn default() -> Self {
        Self::new(6.0, 24.0, 12.0, 8.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 15.0));
    }

    #[test]
    fn hit_box_center() {
        let hb = HitBox::default();
        let c = hb.center_at(Point::new(100.0, 100.0));
        assert_eq!(c, Point::new(112.0, 128.0));
    }
}
