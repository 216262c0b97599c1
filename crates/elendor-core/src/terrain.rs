use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::raster::RasterMask;

/// How the red channel of the terrain raster maps to a speed factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainRules {
    /// Red values strictly above this are fast ground (roads).
    pub fast_above: u8,
    /// Speed factor on fast ground.
    pub fast_factor: f64,
    /// Red values strictly below this are slow ground (swamp, sand).
    pub slow_below: u8,
    /// Speed factor on slow ground.
    pub slow_factor: f64,
}

impl Default for TerrainRules {
    fn default() -> Self {
        Self {
            fast_above: 200,
            fast_factor: 1.5,
            slow_below: 50,
            slow_factor: 0.5,
        }
    }
}

/// Optional per-pixel movement speed modifier.
#[derive(Debug, Clone, Default)]
pub struct TerrainIndex {
    mask: Option<Arc<RasterMask>>,
    rules: TerrainRules,
}

impl TerrainIndex {
    /// Wrap a terrain raster.
    pub fn new(mask: Arc<RasterMask>, rules: TerrainRules) -> Self {
        Self {
            mask: Some(mask),
            rules,
        }
    }

    /// Uniform terrain: every position has factor 1.0.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Whether a terrain raster is attached.
    pub fn is_loaded(&self) -> bool {
        self.mask.is_some()
    }

    /// Speed multiplier at a position.
    pub fn speed_factor(&self, x: f64, y: f64) -> f64 {
        let Some(mask) = &self.mask else {
            return 1.0;
        };
        let red = mask.sample(x, y).r;
        if red > self.rules.fast_above {
            self.rules.fast_factor
        } else if red < self.rules.slow_below {
            self.rules.slow_factor
        } else {
            1.0
        }
    }
}
