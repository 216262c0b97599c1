use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::collision::CollisionIndex;
use crate::config::RasterConventions;
use crate::error::LoadResult;
use crate::geom::Size;
use crate::location::{LocationIndex, ZoneTable};
use crate::raster::RasterMask;
use crate::spawn::SpawnIndex;
use crate::terrain::TerrainIndex;

/// Collision raster file name inside an asset directory.
pub const COLLISION_FILE: &str = "Collision.png";
/// Spawn marker raster file name.
pub const SPAWN_FILE: &str = "Spawn.png";
/// Zone color raster file name.
pub const LOCATION_FILE: &str = "WorldLocations.png";
/// Terrain speed raster file name.
pub const TERRAIN_FILE: &str = "TerrainMovement.png";
/// Display map file name.
pub const MAP_FILE: &str = "Map.png";

/// Where the world rasters live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Dark-is-solid collision raster. Required.
    pub collision: PathBuf,
    /// Spawn marker raster. Required.
    pub spawn: PathBuf,
    /// Zone color raster. Failure degrades to "no zone".
    pub location: PathBuf,
    /// Terrain speed raster. Optional.
    pub terrain: Option<PathBuf>,
}

impl AssetPaths {
    /// Conventional file names inside `dir`. The terrain raster is only
    /// included if the file exists.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let terrain = dir.join(TERRAIN_FILE);
        Self {
            collision: dir.join(COLLISION_FILE),
            spawn: dir.join(SPAWN_FILE),
            location: dir.join(LOCATION_FILE),
            terrain: terrain.exists().then_some(terrain),
        }
    }
}

/// The read-only world indexes a session needs, built once at startup.
#[derive(Debug, Clone)]
pub struct SessionAssets {
    /// World size, taken from the collision raster.
    pub world: Size,
    /// Walkability queries.
    pub collision: CollisionIndex,
    /// Spawn points.
    pub spawns: SpawnIndex,
    /// Zone lookup.
    pub locations: LocationIndex,
    /// Speed modifiers.
    pub terrain: TerrainIndex,
}

impl SessionAssets {
    /// Decode every raster in parallel on the blocking pool.
    ///
    /// Collision and spawn failures are fatal. A location or terrain failure
    /// is logged and the session runs without zones or terrain.
    pub async fn load(
        paths: &AssetPaths,
        conventions: &RasterConventions,
        zones: ZoneTable,
    ) -> LoadResult<Self> {
        let terrain_path = paths.terrain.clone();
        let (required, location, terrain) = tokio::join!(
            async {
                tokio::try_join!(
                    RasterMask::load(paths.collision.clone()),
                    RasterMask::load(paths.spawn.clone()),
                )
            },
            RasterMask::load(paths.location.clone()),
            async move {
                match terrain_path {
                    Some(path) => Some(RasterMask::load(path).await),
                    None => None,
                }
            },
        );
        let (collision, spawn) = required?;

        let location = location
            .map_err(|e| warn!(error = %e, "zone raster unavailable, zones disabled"))
            .ok();
        let terrain = match terrain {
            Some(Ok(mask)) => Some(mask),
            Some(Err(e)) => {
                warn!(error = %e, "terrain raster unavailable, using flat terrain");
                None
            }
            None => None,
        };

        let assets = Self::from_masks(collision, &spawn, location, terrain, conventions, zones);
        info!(
            width = assets.world.width,
            height = assets.world.height,
            spawns = assets.spawns.len(),
            zones = assets.locations.is_loaded(),
            terrain = assets.terrain.is_loaded(),
            "world assets loaded"
        );
        Ok(assets)
    }

    /// Build indexes from rasters already in memory.
    pub fn from_masks(
        collision: RasterMask,
        spawn: &RasterMask,
        location: Option<RasterMask>,
        terrain: Option<RasterMask>,
        conventions: &RasterConventions,
        zones: ZoneTable,
    ) -> Self {
        let world = Size::new(f64::from(collision.width()), f64::from(collision.height()));
        let spawns = SpawnIndex::scan(
            spawn,
            conventions.spawn_sentinel,
            conventions.spawn_marker_size,
            conventions.fallback_spawn,
        );
        let locations = match location {
            Some(mask) => LocationIndex::new(Arc::new(mask), zones),
            None => LocationIndex::unloaded(zones),
        };
        let terrain = match terrain {
            Some(mask) => TerrainIndex::new(Arc::new(mask), conventions.terrain),
            None => TerrainIndex::flat(),
        };
        Self {
            world,
            collision: CollisionIndex::new(Arc::new(collision), conventions.collision_threshold),
            spawns,
            locations,
            terrain,
        }
    }
}
