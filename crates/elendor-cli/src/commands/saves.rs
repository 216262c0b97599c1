use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn list(dir: &Path) -> Result<(), String> {
    let slots = super::open_slots(dir)?;
    let infos = slots.list().map_err(|e| e.to_string())?;

    if infos.is_empty() {
        println!("  No saves.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Slot", "Name", "Player", "Class", "Day", "Saved"]);
    for info in &infos {
        table.add_row(vec![
            info.slot.to_string(),
            info.name.clone(),
            info.player.clone(),
            info.archetype.to_string(),
            info.day.to_string(),
            info.saved_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!();
    match slots.next_available() {
        Some(slot) => println!("  {} saves, next free slot: {slot}", infos.len()),
        None => println!("  {} saves, {}", infos.len(), "all slots used".yellow()),
    }
    Ok(())
}

pub fn delete(dir: &Path, slot: usize) -> Result<(), String> {
    let mut slots = super::open_slots(dir)?;
    if slots.delete(slot).map_err(|e| e.to_string())? {
        println!("  {} slot {slot}", "Deleted".green());
        Ok(())
    } else {
        Err(format!("slot {slot} is empty"))
    }
}

pub fn clear(dir: &Path) -> Result<(), String> {
    let mut slots = super::open_slots(dir)?;
    slots.clear_all().map_err(|e| e.to_string())?;
    println!("  {} all save slots", "Cleared".green());
    Ok(())
}
