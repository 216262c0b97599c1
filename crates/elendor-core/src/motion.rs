use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collision::CollisionIndex;
use crate::geom::{HitBox, Point, Size};
use crate::input::InputIntent;
use crate::terrain::TerrainIndex;

/// Facing direction of the player sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing up.
    Up,
    /// Facing down, toward the camera.
    #[default]
    Down,
    /// Facing left.
    Left,
    /// Facing right.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Locomotion state derived each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementState {
    /// No directional input.
    #[default]
    Idle,
    /// Moving at walking speed.
    Walking,
    /// Moving at running speed.
    Running,
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Running => "running",
        })
    }
}

/// Speeds and sprite geometry for player movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Base speed in pixels per tick.
    pub base_speed: f64,
    /// Multiplier while walking.
    pub walk_multiplier: f64,
    /// Multiplier while running.
    pub run_multiplier: f64,
    /// Sprite footprint used for world-bounds clamping.
    pub sprite: Size,
    /// Collision box inside the sprite.
    pub hit_box: HitBox,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.25,
            walk_multiplier: 1.0,
            run_multiplier: 1.6,
            sprite: Size::new(24.0, 32.0),
            hit_box: HitBox::default(),
        }
    }
}

impl MotionConfig {
    /// Set the base speed in pixels per tick.
    pub fn with_base_speed(mut self, speed: f64) -> Self {
        self.base_speed = speed;
        self
    }

    /// Set the walking multiplier.
    pub fn with_walk_multiplier(mut self, multiplier: f64) -> Self {
        self.walk_multiplier = multiplier;
        self
    }

    /// Set the running multiplier.
    pub fn with_run_multiplier(mut self, multiplier: f64) -> Self {
        self.run_multiplier = multiplier;
        self
    }

    /// Set the sprite footprint.
    pub fn with_sprite(mut self, sprite: Size) -> Self {
        self.sprite = sprite;
        self
    }

    /// Set the collision box.
    pub fn with_hit_box(mut self, hit_box: HitBox) -> Self {
        self.hit_box = hit_box;
        self
    }
}

/// Result of one motion tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    /// Whether the position changed.
    pub moved: bool,
    /// Whether the player ran this tick.
    pub running: bool,
}

/// Moves the player one tick at a time, sliding along walls.
#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    world: Size,
    position: Point,
    direction: Direction,
    state: MovementState,
    sprint_toggled: bool,
}

impl MotionController {
    /// Place a controller at `spawn` inside a world of the given size.
    pub fn new(config: MotionConfig, world: Size, spawn: Point) -> Self {
        let mut controller = Self {
            config,
            world,
            position: spawn,
            direction: Direction::default(),
            state: MovementState::default(),
            sprint_toggled: false,
        };
        controller.position = controller.clamp(spawn);
        controller
    }

    /// Current sprite position (top-left).
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current facing.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Movement state from the last tick.
    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Whether the sprint toggle is on.
    pub fn sprint_toggled(&self) -> bool {
        self.sprint_toggled
    }

    /// Turn the sprint toggle on or off.
    pub fn set_sprint_toggle(&mut self, on: bool) {
        self.sprint_toggled = on;
    }

    /// Active configuration.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// World size.
    pub fn world(&self) -> Size {
        self.world
    }

    /// Center of the collision box, the point used for zone and terrain lookups.
    pub fn feet(&self) -> Point {
        self.config.hit_box.center_at(self.position)
    }

    /// Whether this intent asks to sprint, held or toggled. Updates the
    /// toggle on a toggle press.
    pub fn register_sprint(&mut self, intent: &InputIntent) -> bool {
        if intent.sprint_toggle {
            self.sprint_toggled = !self.sprint_toggled;
        }
        intent.sprint_held || self.sprint_toggled
    }

    /// Advance one tick. `sprint_allowed` reflects stamina and cooldown;
    /// a disallowed sprint request silently walks.
    pub fn step(
        &mut self,
        intent: &InputIntent,
        sprint_allowed: bool,
        collision: &CollisionIndex,
        terrain: &TerrainIndex,
    ) -> MotionOutcome {
        let sprint_requested = self.register_sprint(intent);
        let (ax, ay) = intent.axes();

        if ax == 0 && ay == 0 {
            self.state = MovementState::Idle;
            return MotionOutcome {
                moved: false,
                running: false,
            };
        }

        let running = sprint_requested && sprint_allowed;
        let multiplier = if running {
            self.config.run_multiplier
        } else {
            self.config.walk_multiplier
        };
        let feet = self.feet();
        let speed = self.config.base_speed * multiplier * terrain.speed_factor(feet.x, feet.y);

        let mut dx = f64::from(ax) * speed;
        let mut dy = f64::from(ay) * speed;
        if ax != 0 && ay != 0 {
            dx *= FRAC_1_SQRT_2;
            dy *= FRAC_1_SQRT_2;
        }

        let before = self.position;
        let hb = self.config.hit_box;
        let mut next = before;

        let candidate_x = before.x + dx;
        if dx != 0.0
            && !collision.is_box_blocked(
                candidate_x + hb.offset_x,
                next.y + hb.offset_y,
                hb.width,
                hb.height,
            )
        {
            next.x = candidate_x;
        }

        let candidate_y = before.y + dy;
        if dy != 0.0
            && !collision.is_box_blocked(
                next.x + hb.offset_x,
                candidate_y + hb.offset_y,
                hb.width,
                hb.height,
            )
        {
            next.y = candidate_y;
        }

        self.position = self.clamp(next);

        if ay < 0 {
            self.direction = Direction::Up;
        } else if ay > 0 {
            self.direction = Direction::Down;
        }
        if ax < 0 {
            self.direction = Direction::Left;
        } else if ax > 0 {
            self.direction = Direction::Right;
        }

        self.state = if running {
            MovementState::Running
        } else {
            MovementState::Walking
        };

        MotionOutcome {
            moved: self.position != before,
            running,
        }
    }

    /// Mark the current sprint as force-stopped: the state drops to walking
    /// and the toggle is cleared.
    pub fn stop_sprint(&mut self) {
        self.sprint_toggled = false;
        if self.state == MovementState::Running {
            self.state = MovementState::Walking;
        }
    }

    /// Move directly to `target`, clamped into the world.
    pub fn teleport(&mut self, target: Point) {
        self.position = self.clamp(target);
        self.state = MovementState::Idle;
    }

    /// Restore facing without moving.
    pub fn face(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn clamp(&self, p: Point) -> Point {
        let max_x = (self.world.width - self.config.sprite.width).max(0.0);
        let max_y = (self.world.height - self.config.sprite.height).max(0.0);
        Point::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collision::DEFAULT_COLLISION_THRESHOLD;
    use crate::raster::{RasterMask, Rgb};

    fn open_world() -> CollisionIndex {
        CollisionIndex::new(
            Arc::new(RasterMask::filled(1000, 1000, Rgb::WHITE)),
            DEFAULT_COLLISION_THRESHOLD,
        )
    }

    fn wall_at(x_range: std::ops::Range<u32>) -> CollisionIndex {
        let mask = RasterMask::from_fn(1000, 1000, |x, _| {
            if x_range.contains(&x) { Rgb::BLACK } else { Rgb::WHITE }
        });
        CollisionIndex::new(Arc::new(mask), DEFAULT_COLLISION_THRESHOLD)
    }

    fn simple_config() -> MotionConfig {
        MotionConfig::default()
            .with_base_speed(2.0)
            .with_walk_multiplier(2.0)
            .with_sprite(Size::new(10.0, 10.0))
            .with_hit_box(HitBox::new(0.0, 0.0, 10.0, 10.0))
    }

    fn right() -> InputIntent {
        InputIntent {
            right: true,
            ..InputIntent::IDLE
        }
    }

    #[test]
    fn config_default_values() {
        let config = MotionConfig::default();
        assert!((config.base_speed - 2.25).abs() < f64::EPSILON);
        assert!((config.run_multiplier - 1.6).abs() < f64::EPSILON);
        assert_eq!(config.sprite, Size::new(24.0, 32.0));
        assert_eq!(config.hit_box, HitBox::new(6.0, 24.0, 12.0, 8.0));
    }

    #[test]
    fn walking_right_sixty_ticks() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let collision = open_world();
        let terrain = TerrainIndex::flat();
        for _ in 0..60 {
            mc.step(&right(), true, &collision, &terrain);
        }
        assert!((mc.position().x - 340.0).abs() < 1e-9);
        assert!((mc.position().y - 100.0).abs() < f64::EPSILON);
        assert_eq!(mc.direction(), Direction::Right);
        assert_eq!(mc.state(), MovementState::Walking);
    }

    #[test]
    fn wall_stalls_movement() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let collision = wall_at(351..371);
        let terrain = TerrainIndex::flat();
        for _ in 0..60 {
            mc.step(&right(), false, &collision, &terrain);
        }
        assert!((mc.position().x - 340.0).abs() < 1e-9);
        for _ in 0..30 {
            let outcome = mc.step(&right(), false, &collision, &terrain);
            assert!(!outcome.moved);
            assert!((mc.position().x - 340.0).abs() < 1e-9);
        }
    }

    #[test]
    fn diagonal_slides_along_wall() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(340.0, 100.0));
        let collision = wall_at(351..371);
        let terrain = TerrainIndex::flat();
        let intent = InputIntent {
            right: true,
            down: true,
            ..InputIntent::IDLE
        };
        let step = 4.0 * FRAC_1_SQRT_2;
        for i in 1..=10 {
            mc.step(&intent, false, &collision, &terrain);
            assert!((mc.position().x - 340.0).abs() < 1e-9);
            assert!((mc.position().y - (100.0 + step * f64::from(i))).abs() < 1e-9);
        }
        assert_eq!(mc.direction(), Direction::Right);
    }

    #[test]
    fn diagonal_speed_is_normalized() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let intent = InputIntent {
            up: true,
            left: true,
            ..InputIntent::IDLE
        };
        mc.step(&intent, false, &open_world(), &TerrainIndex::flat());
        let p = mc.position();
        let dist = ((p.x - 100.0).powi(2) + (p.y - 100.0).powi(2)).sqrt();
        assert!((dist - 4.0).abs() < 1e-9);
        assert_eq!(mc.direction(), Direction::Left);
    }

    #[test]
    fn vertical_only_sets_vertical_direction() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let up = InputIntent {
            up: true,
            ..InputIntent::IDLE
        };
        mc.step(&up, false, &open_world(), &TerrainIndex::flat());
        assert_eq!(mc.direction(), Direction::Up);
        mc.step(&InputIntent::IDLE, false, &open_world(), &TerrainIndex::flat());
        assert_eq!(mc.direction(), Direction::Up);
        assert_eq!(mc.state(), MovementState::Idle);
    }

    #[test]
    fn running_requires_permission() {
        let world = Size::new(1000.0, 1000.0);
        let config = simple_config().with_run_multiplier(3.0);
        let mut mc = MotionController::new(config, world, Point::new(100.0, 100.0));
        let sprint_right = InputIntent {
            sprint_held: true,
            ..right()
        };
        let out = mc.step(&sprint_right, false, &open_world(), &TerrainIndex::flat());
        assert!(!out.running);
        assert_eq!(mc.state(), MovementState::Walking);
        assert!((mc.position().x - 104.0).abs() < 1e-9);

        let out = mc.step(&sprint_right, true, &open_world(), &TerrainIndex::flat());
        assert!(out.running);
        assert_eq!(mc.state(), MovementState::Running);
        assert!((mc.position().x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_flips_on_press() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let press = InputIntent {
            sprint_toggle: true,
            ..right()
        };
        let out = mc.step(&press, true, &open_world(), &TerrainIndex::flat());
        assert!(out.running);
        assert!(mc.sprint_toggled());
        let out = mc.step(&right(), true, &open_world(), &TerrainIndex::flat());
        assert!(out.running);
        mc.stop_sprint();
        assert!(!mc.sprint_toggled());
        assert_eq!(mc.state(), MovementState::Walking);
    }

    #[test]
    fn clamps_to_world_bounds() {
        let world = Size::new(200.0, 200.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(188.0, 5.0));
        let up_right = InputIntent {
            up: true,
            right: true,
            ..InputIntent::IDLE
        };
        let c = CollisionIndex::new(
            Arc::new(RasterMask::filled(200, 200, Rgb::WHITE)),
            DEFAULT_COLLISION_THRESHOLD,
        );
        for _ in 0..20 {
            mc.step(&up_right, false, &c, &TerrainIndex::flat());
        }
        assert_eq!(mc.position(), Point::new(190.0, 0.0));
    }

    #[test]
    fn spawn_and_teleport_are_clamped() {
        let world = Size::new(200.0, 200.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(-5.0, 500.0));
        assert_eq!(mc.position(), Point::new(0.0, 190.0));
        mc.teleport(Point::new(50.0, 60.0));
        assert_eq!(mc.position(), Point::new(50.0, 60.0));
    }

    #[test]
    fn pending_collision_blocks_all_movement() {
        let world = Size::new(1000.0, 1000.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(100.0, 100.0));
        let out = mc.step(&right(), false, &CollisionIndex::pending(), &TerrainIndex::flat());
        assert!(!out.moved);
        assert_eq!(mc.position(), Point::new(100.0, 100.0));
        // Still faces the pressed direction.
        assert_eq!(mc.direction(), Direction::Right);
    }

    #[test]
    fn terrain_scales_speed() {
        let world = Size::new(100.0, 100.0);
        let mut mc = MotionController::new(simple_config(), world, Point::new(10.0, 10.0));
        let fast = TerrainIndex::new(
            Arc::new(RasterMask::filled(100, 100, Rgb::new(255, 255, 255))),
            crate::terrain::TerrainRules::default(),
        );
        let c = CollisionIndex::new(
            Arc::new(RasterMask::filled(100, 100, Rgb::WHITE)),
            DEFAULT_COLLISION_THRESHOLD,
        );
        mc.step(&right(), false, &c, &fast);
        assert!((mc.position().x - 16.0).abs() < 1e-9);
    }
}
