use rand::Rng;
use tracing::{debug, warn};

use crate::geom::Point;
use crate::raster::{RasterMask, Rgb};

/// Spawn used when the spawn raster holds no markers.
pub const DEFAULT_FALLBACK_SPAWN: Point = Point::new(100.0, 100.0);
/// Edge length of a spawn marker blob in pixels.
pub const DEFAULT_MARKER_SIZE: u32 = 5;

/// Precomputed spawn coordinates found by scanning a marker raster once.
#[derive(Debug, Clone)]
pub struct SpawnIndex {
    points: Vec<Point>,
    fallback: Point,
}

impl SpawnIndex {
    /// Scan `mask` for sentinel-colored marker blobs.
    ///
    /// Rows are scanned left to right. A hit records its coordinate and skips
    /// the rest of the marker's width; hits directly below a sentinel pixel
    /// belong to a marker already recorded on an earlier row and are skipped.
    pub fn scan(mask: &RasterMask, sentinel: Rgb, marker_size: u32, fallback: Point) -> Self {
        let skip = marker_size.max(1);
        let mut points = Vec::new();
        for y in 0..mask.height() {
            let mut x = 0;
            while x < mask.width() {
                if mask.pixel(x, y) != sentinel {
                    x += 1;
                    continue;
                }
                let continues_marker = y > 0 && mask.pixel(x, y - 1) == sentinel;
                if continues_marker {
                    x += 1;
                    continue;
                }
                points.push(Point::new(f64::from(x), f64::from(y)));
                x += skip;
            }
        }

        if points.is_empty() {
            warn!(
                fallback_x = fallback.x,
                fallback_y = fallback.y,
                "spawn raster contains no markers, using fallback spawn"
            );
        } else {
            debug!(count = points.len(), "scanned spawn markers");
        }

        Self { points, fallback }
    }

    /// Build an index from explicit points.
    pub fn from_points(points: Vec<Point>, fallback: Point) -> Self {
        Self { points, fallback }
    }

    /// An index whose raster has not loaded. Always yields the fallback.
    pub fn pending(fallback: Point) -> Self {
        Self::from_points(Vec::new(), fallback)
    }

    /// All recorded spawn points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The fallback spawn.
    pub fn fallback(&self) -> Point {
        self.fallback
    }

    /// Number of recorded spawn points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the scan found nothing.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A uniformly random spawn point, or the fallback when there are none.
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        if self.points.is_empty() {
            return self.fallback;
        }
        self.points[rng.random_range(0..self.points.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn with_markers(origins: &[(u32, u32)], size: u32) -> RasterMask {
        RasterMask::from_fn(64, 64, |x, y| {
            let inside = origins
                .iter()
                .any(|&(ox, oy)| x >= ox && x < ox + size && y >= oy && y < oy + size);
            if inside { Rgb::BLACK } else { Rgb::WHITE }
        })
    }

    #[test]
    fn one_point_per_marker() {
        let mask = with_markers(&[(10, 10), (40, 20)], 5);
        let idx = SpawnIndex::scan(&mask, Rgb::BLACK, 5, DEFAULT_FALLBACK_SPAWN);
        assert_eq!(
            idx.points(),
            &[Point::new(10.0, 10.0), Point::new(40.0, 20.0)]
        );
    }

    #[test]
    fn adjacent_markers_on_same_row() {
        let mask = with_markers(&[(0, 0), (5, 0)], 5);
        let idx = SpawnIndex::scan(&mask, Rgb::BLACK, 5, DEFAULT_FALLBACK_SPAWN);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.points()[1], Point::new(5.0, 0.0));
    }

    #[test]
    fn custom_sentinel() {
        let red = Rgb::new(255, 0, 0);
        let mask = RasterMask::from_fn(16, 16, |x, y| if x == 3 && y == 4 { red } else { Rgb::BLACK });
        let idx = SpawnIndex::scan(&mask, red, 1, DEFAULT_FALLBACK_SPAWN);
        assert_eq!(idx.points(), &[Point::new(3.0, 4.0)]);
    }

    #[test]
    fn empty_scan_uses_fallback() {
        let mask = RasterMask::filled(32, 32, Rgb::WHITE);
        let idx = SpawnIndex::scan(&mask, Rgb::BLACK, 5, DEFAULT_FALLBACK_SPAWN);
        assert!(idx.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(idx.random_spawn(&mut rng), Point::new(100.0, 100.0));
    }

    #[test]
    fn pending_uses_fallback() {
        let idx = SpawnIndex::pending(Point::new(7.0, 8.0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(idx.random_spawn(&mut rng), Point::new(7.0, 8.0));
    }

    #[test]
    fn random_spawn_picks_recorded_points() {
        let mask = with_markers(&[(0, 0), (20, 20), (40, 40)], 5);
        let idx = SpawnIndex::scan(&mask, Rgb::BLACK, 5, DEFAULT_FALLBACK_SPAWN);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let p = idx.random_spawn(&mut rng);
            assert!(idx.points().contains(&p));
        }
    }

    #[test]
    fn random_spawn_is_deterministic_per_seed() {
        let mask = with_markers(&[(0, 0), (20, 20), (40, 40)], 5);
        let idx = SpawnIndex::scan(&mask, Rgb::BLACK, 5, DEFAULT_FALLBACK_SPAWN);
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10).map(|_| idx.random_spawn(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(picks(5), picks(5));
    }
}
