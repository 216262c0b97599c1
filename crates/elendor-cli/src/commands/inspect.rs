use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub async fn run(dir: &Path, config: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config)?;
    let assets = super::load_assets(dir, &config).await?;

    println!(
        "  {} {}",
        "World".bold(),
        format!("({})", dir.display()).dimmed()
    );
    println!(
        "  Size: {} x {} px",
        assets.world.width, assets.world.height
    );

    if let Some(mask) = assets.collision.mask() {
        let total = u64::from(mask.width()) * u64::from(mask.height());
        let blocked = mask
            .pixels()
            .filter(|(_, _, color)| color.average() < assets.collision.threshold())
            .count() as u64;
        let share = if total > 0 {
            blocked as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        println!("  Blocked: {blocked} px ({share:.1}%)");
    }
    println!(
        "  Terrain: {}",
        if assets.terrain.is_loaded() {
            "loaded".green()
        } else {
            "flat".dimmed()
        }
    );
    println!();

    println!("  {}", "Spawn Points".bold().underline());
    if assets.spawns.is_empty() {
        let fallback = assets.spawns.fallback();
        println!(
            "  {} no markers found, using fallback ({}, {})",
            "WARN".yellow().bold(),
            fallback.x,
            fallback.y
        );
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "X", "Y"]);
        for (i, p) in assets.spawns.points().iter().enumerate() {
            table.add_row(vec![i.to_string(), format!("{:.0}", p.x), format!("{:.0}", p.y)]);
        }
        println!("{table}");
        println!("  {} spawn points", assets.spawns.len());
    }
    println!();

    println!("  {}", "Zones".bold().underline());
    if !assets.locations.is_loaded() {
        println!("  {}", "(zone raster unavailable)".dimmed());
        return Ok(());
    }

    let (coverage, unmapped) = assets.locations.coverage();
    let total: u64 = coverage.values().sum::<u64>() + unmapped;
    let table_entries = assets.locations.table().entries();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Zone", "Color", "Pixels", "Share"]);
    for (color, name) in &table_entries {
        let pixels = coverage.get(*name).copied().unwrap_or(0);
        if pixels == 0 {
            continue;
        }
        table.add_row(vec![
            name.to_string(),
            color.to_string(),
            pixels.to_string(),
            format!("{:.1}%", pixels as f64 * 100.0 / total.max(1) as f64),
        ]);
    }
    println!("{table}");
    println!(
        "  {} of {} zones present, {unmapped} px open country",
        coverage.len(),
        table_entries.len()
    );

    Ok(())
}
