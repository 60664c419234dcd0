//! # Pixeldelve Entry Point
//!
//! Loads appearance definitions, generates one level and prints what it made.

use clap::Parser;
use log::{error, info};
use pixeldelve::{
    builtin_appearances, utils, AppearanceDefinitions, DefinitionTable, DelveResult,
    GenerationConfig, Generator, HallwayRouting, Level, LevelGenerator, LevelSummary,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for pixeldelve.
#[derive(Parser, Debug)]
#[command(name = "pixeldelve")]
#[command(about = "Generates room-and-hallway dungeon levels made of pixel-encoded sprites")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Level width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u16,

    /// Level height in pixels
    #[arg(long, default_value_t = 768)]
    height: u16,

    /// JSON file with an `appearances` table; built-in appearances otherwise
    #[arg(long)]
    appearances: Option<PathBuf>,

    /// Route hallways around rooms instead of straight L shapes
    #[arg(long)]
    avoid_rooms: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print an ASCII map of the level
    #[arg(long)]
    map: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting pixeldelve v{}", pixeldelve::VERSION);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes `env_logger` at the requested level, unless `RUST_LOG` is set.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn run(args: &Args) -> DelveResult<()> {
    let appearances = load_appearances(args)?;

    let config = GenerationConfig {
        hallway_routing: if args.avoid_rooms {
            HallwayRouting::AvoidRooms
        } else {
            HallwayRouting::LShaped
        },
        ..GenerationConfig::new(args.seed)
    };
    let generator = LevelGenerator::new(args.width, args.height).with_appearances(appearances);

    info!(
        "Generating {}x{} level with seed {} using {}",
        args.width,
        args.height,
        config.seed,
        generator.generator_type()
    );
    let mut rng = utils::create_rng(&config);
    let level = generator.generate(&config, &mut rng)?;

    print_summary(&level);
    if args.map {
        println!();
        print!("{}", render_map(&level));
    }
    Ok(())
}

fn load_appearances(args: &Args) -> DelveResult<AppearanceDefinitions> {
    match &args.appearances {
        Some(path) => {
            let table: AppearanceDefinitions = DefinitionTable::from_path(path)?;
            info!("Loaded {} appearances from {}", table.len(), path.display());
            Ok(table)
        }
        None => Ok(builtin_appearances()),
    }
}

fn print_summary(level: &Level) {
    let summary = LevelSummary::of(level);
    println!("{}", level.id());
    println!(
        "  rooms: {} ({} furnished), coverage {}/{} pixels",
        summary.rooms,
        summary.furnished_rooms,
        level.calculate_total_room_area_in_pixels(),
        level.max_room_area()
    );
    println!(
        "  hallways: {} ({} tiles)",
        summary.hallways, summary.hallway_tiles
    );
    println!(
        "  characters: {}, player placed: {}",
        summary.characters,
        if summary.has_player { "yes" } else { "no" }
    );
    for (i, room) in level.rooms().iter().enumerate() {
        println!("  room {}: {} [{}]", i, room.bounds.id(), room.stage());
    }
}

/// One character per block. Rooms are drawn over hallways.
fn render_map(level: &Level) -> String {
    let block = pixeldelve::config::DEFAULT_BLOCK_SIZE as i32;
    let cols = (level.width() as i32 / block) as usize;
    let rows = (level.height() as i32 / block) as usize;
    let mut cells = vec![vec![' '; cols]; rows];

    let entities = level
        .hallways()
        .iter()
        .flat_map(|hallway| hallway.tiles())
        .chain(level.rooms().iter().flat_map(|room| room.entities()));
    for entity in entities {
        let position = entity.position();
        if position.x < 0 || position.y < 0 {
            continue;
        }
        let (col, row) = ((position.x / block) as usize, (position.y / block) as usize);
        if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = entity.symbol();
        }
    }

    cells
        .into_iter()
        .map(|row| {
            let mut line: String = row.into_iter().collect();
            line.truncate(line.trim_end().len());
            line.push('\n');
            line
        })
        .collect()
}
