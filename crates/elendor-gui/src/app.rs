//! Application state shared across all screens.

use std::path::{Path, PathBuf};

use elendor_core::assets::MAP_FILE;
use elendor_core::camera::Camera;
use elendor_core::location::ZoneTable;
use elendor_core::save::{DirStore, SaveSlots};
use elendor_core::{
    AssetPaths, PlayerProfile, Point, RasterMask, Session, SessionAssets, SessionConfig,
};
use macroquad::prelude::*;
use tracing::info;

/// Command-line options for the window.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Directory holding the world rasters.
    pub assets_dir: PathBuf,
    /// Optional session config JSON.
    pub config: Option<PathBuf>,
    /// Directory holding save slots.
    pub saves_dir: PathBuf,
}

impl LaunchOptions {
    /// Parse `--assets <dir>`, `--config <file>` and `--saves-dir <dir>`.
    pub fn from_args(args: &[String]) -> Self {
        let value = |flag: &str| {
            args.windows(2)
                .find(|w| w[0] == flag)
                .map(|w| PathBuf::from(&w[1]))
        };
        Self {
            assets_dir: value("--assets").unwrap_or_else(|| PathBuf::from("assets")),
            config: value("--config"),
            saves_dir: value("--saves-dir").unwrap_or_else(|| PathBuf::from("saves")),
        }
    }
}

/// Shared application state accessible by all screens.
pub struct AppState {
    /// Active configuration.
    pub config: SessionConfig,
    /// World indexes, cloned into each new session.
    pub assets: SessionAssets,
    /// World map image.
    pub map: Texture2D,
    /// Save slots on disk.
    pub saves: SaveSlots<DirStore>,
    /// The running session, if any.
    pub session: Option<Session>,
    /// Viewport following the player.
    pub camera: Option<Camera>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Load config, rasters and save slots.
    pub fn load(options: &LaunchOptions) -> Result<Self, String> {
        let config = match &options.config {
            Some(path) => SessionConfig::from_file(path).map_err(|e| e.to_string())?,
            None => SessionConfig::default(),
        };

        let paths = AssetPaths::in_dir(&options.assets_dir);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("cannot start loader: {e}"))?;
        let assets = runtime
            .block_on(SessionAssets::load(
                &paths,
                &config.rasters,
                ZoneTable::elendor(),
            ))
            .map_err(|e| e.to_string())?;

        let map = map_texture(&options.assets_dir, &assets)?;
        let saves = DirStore::open(&options.saves_dir)
            .map(SaveSlots::new)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            config,
            assets,
            map,
            saves,
            session: None,
            camera: None,
            should_quit: false,
        })
    }

    /// Begin a fresh session.
    pub fn start(&mut self, profile: PlayerProfile) {
        let session = Session::start(self.assets.clone(), self.config.clone(), profile);
        self.attach(session);
    }

    /// Resume the session saved in `slot`.
    pub fn continue_from(&mut self, slot: usize) -> Result<(), String> {
        let snapshot = self.saves.load(slot).map_err(|e| e.to_string())?;
        let session = Session::resume(self.assets.clone(), self.config.clone(), &snapshot);
        self.attach(session);
        info!(slot, "continued saved game");
        Ok(())
    }

    /// Most recently written save slot.
    pub fn latest_save(&self) -> Option<usize> {
        self.saves
            .list()
            .ok()?
            .into_iter()
            .max_by_key(|info| info.saved_at)
            .map(|info| info.slot)
    }

    /// Save the running session into the first free slot, or slot 0 when
    /// every slot is taken. Returns the slot used.
    pub fn save(&mut self) -> Result<usize, String> {
        let session = self.session.as_ref().ok_or("no game in progress")?;
        let slot = self.saves.next_available().unwrap_or(0);
        let snapshot = session.export_snapshot();
        let label = format!(
            "{} - {}",
            session.current_zone().unwrap_or("Wilds"),
            session.game_clock()
        );
        self.saves
            .save(slot, &label, &snapshot)
            .map_err(|e| e.to_string())?;
        Ok(slot)
    }

    /// End the running session.
    pub fn quit_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.end();
        }
        self.camera = None;
    }

    /// Snap the camera onto the player.
    pub fn snap_camera(&mut self) {
        if let (Some(session), Some(camera)) = (&self.session, &mut self.camera) {
            camera.snap_to(player_center(session, session.position()));
        }
    }

    fn attach(&mut self, session: Session) {
        let center = player_center(&session, session.position());
        self.camera = Some(Camera::new(
            self.config.camera.clone(),
            session.world(),
            session.tick_ms(),
            center,
        ));
        self.session = Some(session);
    }
}

/// Center of the player sprite drawn at `position`.
pub fn player_center(session: &Session, position: Point) -> Point {
    let sprite = session.config().motion.sprite;
    Point::new(
        position.x + sprite.width / 2.0,
        position.y + sprite.height / 2.0,
    )
}

/// Texture for the world: `Map.png` when present, else the collision raster.
fn map_texture(dir: &Path, assets: &SessionAssets) -> Result<Texture2D, String> {
    let map_path = dir.join(MAP_FILE);
    let owned;
    let raster: &RasterMask = if map_path.exists() {
        owned = RasterMask::open(&map_path).map_err(|e| e.to_string())?;
        &owned
    } else {
        match assets.collision.mask() {
            Some(mask) => mask.as_ref(),
            None => return Err("no map or collision raster to draw".into()),
        }
    };

    let width = u16::try_from(raster.width())
        .map_err(|_| format!("map is too wide to draw ({} px)", raster.width()))?;
    let height = u16::try_from(raster.height())
        .map_err(|_| format!("map is too tall to draw ({} px)", raster.height()))?;
    let texture = Texture2D::from_rgba8(width, height, raster.as_rgba());
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}
