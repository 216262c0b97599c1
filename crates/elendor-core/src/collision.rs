use std::sync::Arc;

use crate::geom::Point;
use crate::raster::RasterMask;

/// Channel average below which a collision pixel counts as solid.
pub const DEFAULT_COLLISION_THRESHOLD: f64 = 128.0;

/// Answers "is this spot walkable?" against a dark-is-solid raster.
///
/// An index without a mask blocks everything, so nothing can move before the
/// collision raster has loaded.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    mask: Option<Arc<RasterMask>>,
    threshold: f64,
}

impl CollisionIndex {
    /// Wrap a loaded collision raster.
    pub fn new(mask: Arc<RasterMask>, threshold: f64) -> Self {
        Self {
            mask: Some(mask),
            threshold,
        }
    }

    /// An index whose raster has not loaded yet. Every query is blocked.
    pub fn pending() -> Self {
        Self {
            mask: None,
            threshold: DEFAULT_COLLISION_THRESHOLD,
        }
    }

    /// Whether a raster is attached.
    pub fn is_loaded(&self) -> bool {
        self.mask.is_some()
    }

    /// The attached raster, if any.
    pub fn mask(&self) -> Option<&Arc<RasterMask>> {
        self.mask.as_ref()
    }

    /// The solidity threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a single point is solid.
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        match &self.mask {
            Some(mask) => mask.sample(x, y).average() < self.threshold,
            None => true,
        }
    }

    /// Whether any of nine sample points on the box is solid: the corners,
    /// the edge midpoints and the center. Right and bottom edges are sampled
    /// at `x + w` and `y + h`.
    pub fn is_box_blocked(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if self.mask.is_none() {
            return true;
        }
        box_sample_points(x, y, w, h)
            .iter()
            .any(|p| self.is_blocked(p.x, p.y))
    }
}

fn box_sample_points(x: f64, y: f64, w: f64, h: f64) -> [Point; 9] {
    let (mx, my) = (x + w / 2.0, y + h / 2.0);
    let (rx, by) = (x + w, y + h);
    [
        Point::new(x, y),
        Point::new(mx, y),
        Point::new(rx, y),
        Point::new(x, my),
        Point::new(mx, my),
        Point::new(rx, my),
        Point::new(x, by),
        Point::new(mx, by),
        Point::new(rx, by),
    ]
}
