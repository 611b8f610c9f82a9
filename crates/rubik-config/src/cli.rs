//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use rubik_cube::MAX_SIZE;

use crate::Config;

/// Command-line arguments for the cube viewer.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "rubik", about = "Interactive NxNxN Rubik's cube")]
pub struct CliArgs {
    /// Edge length of the cube.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SIZE)))]
    pub size: Option<u32>,

    /// Turn animation speed in degrees per second.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Moves to apply at startup, e.g. "R U R' U'".
    #[arg(long)]
    pub moves: Option<String>,

    /// Number of random scramble moves to apply at startup.
    #[arg(long)]
    pub scramble: Option<usize>,

    /// Seed for the scramble generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `scramble` and `seed` describe a one-off startup action and are not
    /// part of the persisted config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.size {
            self.cube.size = size;
        }
        if let Some(speed) = args.speed {
            self.cube.turn_speed_deg_s = speed;
        }
        if let Some(ref moves) = args.moves {
            self.cube.startup_moves = moves.clone();
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
