use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size};

/// Viewport size and follow smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Visible area in world pixels.
    pub viewport: Size,
    /// Fraction of the remaining distance closed per reference tick.
    /// 1.0 locks onto the target.
    pub smoothing: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(480.0, 270.0),
            smoothing: 0.15,
        }
    }
}

/// Viewport that follows a target and never shows outside the world.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    world: Size,
    tick_ms: f64,
    top_left: Point,
}

impl Camera {
    /// Create a camera centered on `target`. `tick_ms` is the reference step
    /// the smoothing factor is expressed against.
    pub fn new(config: CameraConfig, world: Size, tick_ms: f64, target: Point) -> Self {
        let mut camera = Self {
            config,
            world,
            tick_ms,
            top_left: Point::default(),
        };
        camera.snap_to(target);
        camera
    }

    /// Viewport top-left in world pixels.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.config.viewport
    }

    /// Jump straight to `target` (spawns, teleports, loads).
    pub fn snap_to(&mut self, target: Point) {
        self.top_left = self.clamp(self.desired(target));
    }

    /// Ease toward `target` over a frame of `frame_dt_ms`.
    ///
    /// The per-frame factor is `1 - (1 - smoothing)^(dt / tick_ms)`, so the
    /// camera covers the same ground at any frame rate.
    pub fn follow(&mut self, target: Point, frame_dt_ms: f64) {
        let desired = self.clamp(self.desired(target));
        let smoothing = self.config.smoothing.clamp(0.0, 1.0);
        let steps = if self.tick_ms > 0.0 && frame_dt_ms.is_finite() {
            (frame_dt_ms / self.tick_ms).max(0.0)
        } else {
            0.0
        };
        let t = 1.0 - (1.0 - smoothing).powf(steps);
        self.top_left = self.clamp(self.top_left.lerp(desired, t));
    }

    /// Convert a world position to viewport coordinates.
    pub fn world_to_view(&self, p: Point) -> Point {
        Point::new(p.x - self.top_left.x, p.y - self.top_left.y)
    }

    fn desired(&self, target: Point) -> Point {
        Point::new(
            target.x - self.config.viewport.width / 2.0,
            target.y - self.config.viewport.height / 2.0,
        )
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            clamp_axis(p.x, self.config.viewport.width, self.world.width),
            clamp_axis(p.y, self.config.viewport.height, self.world.height),
        )
    }
}

// Centers the world on an axis where it is smaller than the viewport.
fn clamp_axis(v: f64, view: f64, world: f64) -> f64 {
    if world <= view {
        (world - view) / 2.0
    } else {
        v.clamp(0.0, world - view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f64 = 1000.0 / 60.0;

    fn camera(target: Point) -> Camera {
        Camera::new(
            CameraConfig::default(),
            Size::new(2000.0, 1000.0),
            TICK,
            target,
        )
    }

    #[test]
    fn snap_centers_target() {
        let cam = camera(Point::new(1000.0, 500.0));
        assert_eq!(cam.top_left(), Point::new(760.0, 365.0));
        assert_eq!(
            cam.world_to_view(Point::new(1000.0, 500.0)),
            Point::new(240.0, 135.0)
        );
    }

    #[test]
    fn clamps_at_world_edges() {
        let cam = camera(Point::new(0.0, 0.0));
        assert_eq!(cam.top_left(), Point::new(0.0, 0.0));
        let cam = camera(Point::new(5000.0, 5000.0));
        assert_eq!(cam.top_left(), Point::new(1520.0, 730.0));
    }

    #[test]
    fn small_world_is_centered() {
        let cam = Camera::new(
            CameraConfig::default(),
            Size::new(100.0, 100.0),
            TICK,
            Point::new(50.0, 50.0),
        );
        assert_eq!(cam.top_left(), Point::new(-190.0, -85.0));
    }

    #[test]
    fn follow_is_frame_rate_independent() {
        let mut fast = camera(Point::new(1000.0, 500.0));
        let mut slow = camera(Point::new(1000.0, 500.0));
        let target = Point::new(1200.0, 500.0);
        for _ in 0..60 {
            fast.follow(target, TICK);
        }
        for _ in 0..20 {
            slow.follow(target, TICK * 3.0);
        }
        assert!((fast.top_left().x - slow.top_left().x).abs() < 1e-6);
        assert!(fast.top_left().x > 760.0 && fast.top_left().x <= 960.0);
    }

    #[test]
    fn full_smoothing_locks_on() {
        let config = CameraConfig {
            smoothing: 1.0,
            ..CameraConfig::default()
        };
        let mut cam = Camera::new(config, Size::new(2000.0, 1000.0), TICK, Point::new(1000.0, 500.0));
        cam.follow(Point::new(1100.0, 600.0), TICK);
        assert_eq!(cam.top_left(), Point::new(860.0, 465.0));
    }

    #[test]
    fn zero_delta_does_not_move() {
        let mut cam = camera(Point::new(1000.0, 500.0));
        cam.follow(Point::new(1500.0, 500.0), 0.0);
        assert_eq!(cam.top_left(), Point::new(760.0, 365.0));
    }
}
