//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planetsmith command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetsmith", about = "Procedural planet generator")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Icosphere subdivision level of the base mesh.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Built-in biome preset (terran, arid, frozen, volcanic, oceanic, alien).
    #[arg(long)]
    pub preset: Option<String>,

    /// Derive a random biome profile from the seed.
    #[arg(long)]
    pub randomize: bool,

    /// RON file containing a biome profile.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Worker threads for mesh building (0 = one per CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.planet.seed = seed;
        }
        if let Some(resolution) = args.resolution {
            self.planet.resolution = resolution;
        }
        if let Some(ref preset) = args.preset {
            self.planet.preset = preset.clone();
        }
        if args.randomize {
            self.planet.randomize = true;
        }
        if let Some(ref path) = args.profile {
            self.planet.profile_path = Some(path.clone());
        }
        if let Some(threads) = args.threads {
            self.workers.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
