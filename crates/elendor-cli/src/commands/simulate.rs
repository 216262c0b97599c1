use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use elendor_core::{
    Archetype, InputScript, PlayerProfile, Session, SessionSnapshot, SimEvent, SimEventKind,
};

/// Flags for `elendor simulate`.
pub struct SimulateOptions {
    pub input: String,
    pub ticks: Option<u64>,
    pub class: String,
    pub name: String,
    pub seed: u64,
    pub fps: f64,
    pub config: Option<PathBuf>,
    pub load_slot: Option<usize>,
    pub save_slot: Option<usize>,
    pub saves_dir: PathBuf,
    pub json: bool,
    pub verbose: bool,
}

pub async fn run(dir: &Path, options: SimulateOptions) -> Result<(), String> {
    if !options.fps.is_finite() || options.fps <= 0.0 {
        return Err(format!("frame rate must be positive, got {}", options.fps));
    }
    let mut script: InputScript = options
        .input
        .parse()
        .map_err(|e| format!("invalid input script: {e}"))?;
    let archetype: Archetype = options.class.parse()?;

    let config = super::load_config(options.config.as_deref())?.with_seed(options.seed);
    let assets = super::load_assets(dir, &config).await?;

    let mut session = match options.load_slot {
        Some(slot) => {
            let slots = super::open_slots(&options.saves_dir)?;
            let snapshot = slots.load(slot).map_err(|e| e.to_string())?;
            Session::resume(assets, config, &snapshot)
        }
        None => Session::start(assets, config, PlayerProfile::new(&options.name, archetype)),
    };

    let ticks = options.ticks.unwrap_or_else(|| script.duration());
    let frame_ms = 1000.0 / options.fps;
    let mut frames = 0_u64;
    let mut events = Vec::new();
    while session.tick() < ticks {
        let remaining_ms = (ticks - session.tick()) as f64 * session.tick_ms();
        session.frame(frame_ms.min(remaining_ms), &mut script);
        events.extend(session.drain_events());
        frames += 1;
    }
    let dropped = session.dropped_events();
    let label = format!("{} day {}", session.profile().name, session.game_clock().day());
    let snapshot = session.end();

    if let Some(slot) = options.save_slot {
        let mut slots = super::open_slots(&options.saves_dir)?;
        slots
            .save(slot, &label, &snapshot)
            .map_err(|e| e.to_string())?;
    }

    if options.json {
        let json = snapshot.to_json().map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    print_summary(&snapshot, &events, dropped, ticks, frames, &options);
    if let Some(slot) = options.save_slot {
        println!("  {} to slot {slot}", "Saved".green());
    }
    Ok(())
}

fn print_summary(
    snapshot: &SessionSnapshot,
    events: &[SimEvent],
    dropped: u64,
    ticks: u64,
    frames: u64,
    options: &SimulateOptions,
) {
    let player = &snapshot.player;
    println!(
        "  {} {} the {} {}",
        "Simulation".bold(),
        player.profile.name,
        player.profile.archetype,
        format!(
            "({ticks} ticks in {frames} frames, seed={}, {} fps)",
            options.seed, options.fps
        )
        .dimmed()
    );
    if dropped > 0 {
        println!("  {} events logged ({dropped} dropped)", events.len());
    } else {
        println!("  {} events logged", events.len());
    }
    println!();

    if options.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in events {
            let tick_label = format!("[tick {:>5}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if events.is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::ZoneChanged { .. }
                        | SimEventKind::SprintExhausted
                        | SimEventKind::Starving
                        | SimEventKind::Collapsed
                        | SimEventKind::NewDay { .. }
                )
            })
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in notable {
                let tag = match event.kind {
                    SimEventKind::Collapsed | SimEventKind::Starving => "WARN".red().bold(),
                    SimEventKind::SprintExhausted => "TIRED".yellow().bold(),
                    SimEventKind::NewDay { .. } => "DAY".cyan().bold(),
                    _ => "ZONE".blue().bold(),
                };
                println!("  {tag:>5}  {}", event.description);
            }
            println!();
        }
    }

    println!("  {}", "Player Status".bold().underline());
    println!();

    let stats = &player.stats;
    let zones = if snapshot.world.visited_zones.is_empty() {
        "none".to_string()
    } else {
        snapshot
            .world
            .visited_zones
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![
        "Position".to_string(),
        format!("({:.1}, {:.1})", player.position.x, player.position.y),
    ]);
    table.add_row(vec!["Facing".to_string(), player.direction.to_string()]);
    table.add_row(vec![
        "HP".to_string(),
        super::format_bar(stats.hp(), stats.max_hp()),
    ]);
    table.add_row(vec![
        "Stamina".to_string(),
        super::format_bar(stats.stamina(), stats.max_stamina()),
    ]);
    table.add_row(vec![
        "Hunger".to_string(),
        super::format_bar(stats.hunger(), stats.max_hunger()),
    ]);
    table.add_row(vec!["Time".to_string(), snapshot.world.clock.to_string()]);
    table.add_row(vec!["Visited".to_string(), zones]);
    table.add_row(vec![
        "Relics".to_string(),
        format!("{}/8", player.relics.count()),
    ]);
    println!("{table}");
    println!();
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Collapsed => description.red().bold(),
        SimEventKind::Starving => description.red(),
        SimEventKind::SprintExhausted => description.yellow(),
        SimEventKind::SprintRecovered => description.green(),
        SimEventKind::ZoneChanged { .. } | SimEventKind::Respawned => description.blue(),
        SimEventKind::NightFell | SimEventKind::DayBroke | SimEventKind::NewDay { .. } => {
            description.cyan()
        }
        SimEventKind::HourChanged { .. } => description.dimmed(),
        SimEventKind::RelicCollected { .. } => description.magenta().bold(),
    }
}
