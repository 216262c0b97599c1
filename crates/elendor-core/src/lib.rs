//! Deterministic world simulation for Elendor, a top-down 2D RPG.
//!
//! The world is described by a handful of color-coded rasters: one marks
//! walls, one marks spawn points, one paints named zones and an optional one
//! marks fast and slow ground. [`Session`] owns all mutable state and advances
//! it in fixed ticks, so identical inputs give identical runs no matter how
//! frames are paced.

/// Sprite clip selection and frame timing.
pub mod animation;
/// Character classes and their starting stats.
pub mod archetype;
/// Loading the world rasters into indexes.
pub mod assets;
/// Viewport that follows the player.
pub mod camera;
/// Fixed-timestep clock, tick cadences and the in-game calendar.
pub mod clock;
/// Walkability queries against the collision raster.
pub mod collision;
/// Session configuration.
pub mod config;
/// Error types for the core crate.
pub mod error;
/// Session event types and the event log.
pub mod event;
/// Points, sizes and hit boxes.
pub mod geom;
/// Per-tick player intent and scripted input.
pub mod input;
/// Items, equipment and relics.
pub mod inventory;
/// Zone lookup from the location raster.
pub mod location;
/// Player movement with wall sliding.
pub mod motion;
/// Decoded RGB rasters.
pub mod raster;
/// Numbered save slots.
pub mod save;
/// Top-level session orchestrator.
pub mod session;
/// Serializable session state.
pub mod snapshot;
/// Spawn point discovery.
pub mod spawn;
/// HP, stamina and hunger.
pub mod survival;
/// Terrain speed modifiers.
pub mod terrain;

/// Re-exports of [`archetype::Archetype`] and [`archetype::PlayerProfile`].
pub use archetype::{Archetype, PlayerProfile};
/// Re-exports of [`assets::AssetPaths`] and [`assets::SessionAssets`].
pub use assets::{AssetPaths, SessionAssets};
/// Re-exports of the clock types.
pub use clock::{Cadence, GameClock, SimulationClock};
/// Re-export of [`config::SessionConfig`].
pub use config::SessionConfig;
/// Re-exports of the error types.
pub use error::{ConfigError, LoadError, SaveError};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of the geometry types.
pub use geom::{HitBox, Point, Size};
/// Re-exports of the input types.
pub use input::{InputIntent, InputScript, InputSource};
/// Re-exports of [`raster::RasterMask`] and [`raster::Rgb`].
pub use raster::{RasterMask, Rgb};
/// Re-exports of the save slot types.
pub use save::{BlobStore, DirStore, MemoryStore, SaveSlots};
/// Re-exports of the session types.
pub use session::{FrameReport, PauseReason, Session};
/// Re-export of [`snapshot::SessionSnapshot`].
pub use snapshot::SessionSnapshot;
