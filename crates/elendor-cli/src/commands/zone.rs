use std::path::Path;

use colored::Colorize;

pub async fn run(dir: &Path, config: Option<&Path>, x: f64, y: f64) -> Result<(), String> {
    let config = super::load_config(config)?;
    let assets = super::load_assets(dir, &config).await?;

    let zone = match assets.locations.resolve(x, y) {
        Some(name) => name.bold().to_string(),
        None => "open country".dimmed().to_string(),
    };
    let walkable = if assets.collision.is_blocked(x, y) {
        "blocked".red()
    } else {
        "walkable".green()
    };

    println!("  ({x}, {y}): {zone}");
    println!("  Ground: {walkable}");
    println!(
        "  Speed factor: {:.2}",
        assets.terrain.speed_factor(x, y)
    );
    Ok(())
}
