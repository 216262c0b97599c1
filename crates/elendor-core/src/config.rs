use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::clock::{DEFAULT_MAX_FRAME_DELTA_MS, DEFAULT_TICK_RATE, MIN_TICK_MS};
use crate::collision::DEFAULT_COLLISION_THRESHOLD;
use crate::error::{ConfigError, ConfigResult};
use crate::geom::Point;
use crate::motion::MotionConfig;
use crate::raster::Rgb;
use crate::spawn::{DEFAULT_FALLBACK_SPAWN, DEFAULT_MARKER_SIZE};
use crate::survival::SurvivalConfig;
use crate::terrain::TerrainRules;

/// Tick rate and in-game time settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed ticks per second.
    pub tick_rate: f64,
    /// Clamp for a single frame's delta.
    pub max_frame_delta_ms: f64,
    /// Real time per in-game minute.
    pub minute_period_ms: f64,
    /// Day a new session starts on.
    pub start_day: u32,
    /// Hour a new session starts at.
    pub start_hour: u8,
    /// Minute a new session starts at.
    pub start_minute: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
            minute_period_ms: 1000.0,
            start_day: 1,
            start_hour: 6,
            start_minute: 0,
        }
    }
}

impl ClockConfig {
    /// Length of one tick in milliseconds, never shorter than
    /// [`MIN_TICK_MS`]. Non-positive rates use the default.
    pub fn tick_ms(&self) -> f64 {
        if self.tick_rate > 0.0 {
            (1000.0 / self.tick_rate).max(MIN_TICK_MS)
        } else {
            1000.0 / DEFAULT_TICK_RATE
        }
    }
}

/// How the world rasters encode their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConventions {
    /// Collision pixels with a channel average below this are solid.
    pub collision_threshold: f64,
    /// Color of spawn markers.
    pub spawn_sentinel: Rgb,
    /// Edge length of a spawn marker.
    pub spawn_marker_size: u32,
    /// Spawn used when no markers are found.
    pub fallback_spawn: Point,
    /// Terrain speed bands.
    pub terrain: TerrainRules,
}

impl Default for RasterConventions {
    fn default() -> Self {
        Self {
            collision_threshold: DEFAULT_COLLISION_THRESHOLD,
            spawn_sentinel: Rgb::BLACK,
            spawn_marker_size: DEFAULT_MARKER_SIZE,
            fallback_spawn: DEFAULT_FALLBACK_SPAWN,
            terrain: TerrainRules::default(),
        }
    }
}

/// Configuration for a play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// RNG seed for spawn selection.
    pub seed: u64,
    /// Maximum pending event count (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Tick rate and game time.
    pub clock: ClockConfig,
    /// Movement speeds and geometry.
    pub motion: MotionConfig,
    /// Stamina, hunger and HP rates.
    pub survival: SurvivalConfig,
    /// Raster encodings.
    pub rasters: RasterConventions,
    /// Viewport follow settings.
    pub camera: CameraConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_events: 1000,
            clock: ClockConfig::default(),
            motion: MotionConfig::default(),
            survival: SurvivalConfig::default(),
            rasters: RasterConventions::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum pending event count (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the fixed tick rate.
    pub fn with_tick_rate(mut self, ticks_per_second: f64) -> Self {
        self.clock.tick_rate = ticks_per_second;
        self
    }

    /// Set the in-game start time.
    pub fn with_start_time(mut self, day: u32, hour: u8, minute: u8) -> Self {
        self.clock.start_day = day;
        self.clock.start_hour = hour;
        self.clock.start_minute = minute;
        self
    }

    /// Replace the motion settings.
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Replace the survival settings.
    pub fn with_survival(mut self, survival: SurvivalConfig) -> Self {
        self.survival = survival;
        self
    }

    /// Replace the raster conventions.
    pub fn with_rasters(mut self, rasters: RasterConventions) -> Self {
        self.rasters = rasters;
        self
    }

    /// Replace the camera settings.
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}
