//! Headless cube runner.
//!
//! Loads the configuration, queues startup moves and an optional scramble,
//! then drives the fixed-step loop until every turn has been animated and
//! committed.

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::{error, info};

use rubik_app::game_loop::FIXED_DT;
use rubik_app::{GameLoop, PlatformDirs, Session};
use rubik_config::{CliArgs, Config};
use rubik_cube::format_moves;
use rubik_input::KeyBindings;

/// Frames simulated before giving up, so a zero turn speed cannot hang.
const MAX_FRAMES: u64 = 10_000_000;

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

fn load_bindings(dirs: &PlatformDirs) -> KeyBindings {
    let path = dirs.keybindings_path();
    if path.exists() {
        return KeyBindings::load(&path);
    }
    let bindings = KeyBindings::default();
    if let Err(e) = bindings.save(&path) {
        tracing::warn!("Could not write default key bindings: {e}");
    }
    bindings
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => {
            let dirs = PlatformDirs::resolve_with_root(root);
            dirs.create_dirs().map(|()| dirs)
        }
        None => PlatformDirs::resolve_and_create(),
    };
    let dirs = match dirs {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    rubik_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Starting cube runner");

    let mut session = Session::new(&config, load_bindings(&dirs));

    if let Err(e) = session.queue_notation(&config.cube.startup_moves) {
        error!("Invalid startup moves {:?}: {e}", config.cube.startup_moves);
        return ExitCode::FAILURE;
    }
    if let Some(length) = args.scramble {
        let seed = args.seed.unwrap_or_else(clock_seed);
        let moves = session.queue_scramble(length, seed);
        info!(seed, "Scramble: {}", format_moves(&moves));
    }

    let mut game_loop = GameLoop::new();
    while !session.is_idle() {
        if game_loop.frame_count() >= MAX_FRAMES {
            error!("Turns did not finish after {MAX_FRAMES} frames; is the turn speed zero?");
            return ExitCode::FAILURE;
        }
        let frame = game_loop.tick_with_frame_time(
            FIXED_DT,
            |dt, _| session.update(dt as f32, None).map(|_| ()),
            |_| {},
        );
        if let Err(e) = frame {
            error!("Turn commit failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    let draw_list = session.draw_list();
    info!(
        frames = game_loop.frame_count(),
        sim_time = game_loop.total_sim_time(),
        "All turns committed"
    );
    println!("Cube {0}x{0}x{0}", session.lattice().size());
    println!("  turns:   {}", session.engine().committed_turns());
    println!("  cubies:  {}", draw_list.len());
    println!(
        "  solved:  {}",
        if session.lattice().is_solved() { "yes" } else { "no" }
    );
    ExitCode::SUCCESS
}
