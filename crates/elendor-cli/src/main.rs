//! Command-line driver for the Elendor world simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "elendor",
    about = "Elendor: inspect world rasters and run headless sessions",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the world rasters in an asset directory
    Inspect {
        /// Directory holding Collision.png, Spawn.png and friends
        #[arg(short, long, default_value = ".")]
        assets: PathBuf,

        /// Session config JSON overriding raster conventions
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Look up the zone and walkability at a world coordinate
    Zone {
        /// World X coordinate
        x: f64,

        /// World Y coordinate
        y: f64,

        /// Directory holding the world rasters
        #[arg(short, long, default_value = ".")]
        assets: PathBuf,

        /// Session config JSON overriding raster conventions
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run a scripted session without a window
    Simulate {
        /// Input script, e.g. "right*60,up+sprint*30,idle*10"
        #[arg(short, long, default_value = "idle*60")]
        input: String,

        /// Ticks to run (default: the script's length)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Character class: mage, mercenary, ranger or soldier
        #[arg(long, default_value = "soldier")]
        class: String,

        /// Character name
        #[arg(long, default_value = "Wanderer")]
        name: String,

        /// RNG seed for spawn selection
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Simulated render frame rate
        #[arg(long, default_value = "60.0")]
        fps: f64,

        /// Session config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Resume from this save slot
        #[arg(long)]
        load_slot: Option<usize>,

        /// Save the final state into this slot
        #[arg(long)]
        save_slot: Option<usize>,

        /// Directory holding save slots
        #[arg(long, default_value = "saves")]
        saves_dir: PathBuf,

        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Show all events (not just notable ones)
        #[arg(short, long)]
        verbose: bool,

        /// Directory holding the world rasters
        #[arg(short, long, default_value = ".")]
        assets: PathBuf,
    },

    /// Manage save slots
    Saves {
        #[command(subcommand)]
        action: SavesAction,

        /// Directory holding save slots
        #[arg(long, default_value = "saves", global = true)]
        saves_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum SavesAction {
    /// List occupied slots
    List,

    /// Delete one slot
    Delete {
        /// Slot index
        slot: usize,
    },

    /// Delete every slot
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { assets, config } => {
            commands::inspect::run(&assets, config.as_deref()).await
        }
        Commands::Zone {
            x,
            y,
            assets,
            config,
        } => commands::zone::run(&assets, config.as_deref(), x, y).await,
        Commands::Simulate {
            input,
            ticks,
            class,
            name,
            seed,
            fps,
            config,
            load_slot,
            save_slot,
            saves_dir,
            json,
            verbose,
            assets,
        } => {
            let options = commands::simulate::SimulateOptions {
                input,
                ticks,
                class,
                name,
                seed,
                fps,
                config,
                load_slot,
                save_slot,
                saves_dir,
                json,
                verbose,
            };
            commands::simulate::run(&assets, options).await
        }
        Commands::Saves { action, saves_dir } => match action {
            SavesAction::List => commands::saves::list(&saves_dir),
            SavesAction::Delete { slot } => commands::saves::delete(&saves_dir, slot),
            SavesAction::Clear => commands::saves::clear(&saves_dir),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
