pub mod inspect;
pub mod saves;
pub mod simulate;
pub mod zone;

use std::path::Path;

use colored::Colorize;
use elendor_core::location::ZoneTable;
use elendor_core::save::{DirStore, SaveSlots};
use elendor_core::{AssetPaths, SessionAssets, SessionConfig};

/// Read a config file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<SessionConfig, String> {
    match path {
        Some(path) => SessionConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(SessionConfig::default()),
    }
}

/// Decode the world rasters in `dir`.
async fn load_assets(dir: &Path, config: &SessionConfig) -> Result<SessionAssets, String> {
    let paths = AssetPaths::in_dir(dir);
    SessionAssets::load(&paths, &config.rasters, ZoneTable::elendor())
        .await
        .map_err(|e| format!("failed to load world from {}: {e}", dir.display()))
}

/// Open the save slots kept in `dir`.
fn open_slots(dir: &Path) -> Result<SaveSlots<DirStore>, String> {
    DirStore::open(dir)
        .map(SaveSlots::new)
        .map_err(|e| format!("cannot open saves in {}: {e}", dir.display()))
}

/// Render `value / max` as a ten-cell bar, colored by how full it is.
fn format_bar(value: f64, max: f64) -> String {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * 10.0).round() as usize;
    let empty = 10_usize.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let label = format!("{value:.0}/{max:.0}");

    if ratio <= 0.15 {
        format!("[{}] {label}", bar.red())
    } else if ratio <= 0.4 {
        format!("[{}] {label}", bar.yellow())
    } else {
        format!("[{}] {label}", bar.green())
    }
}
