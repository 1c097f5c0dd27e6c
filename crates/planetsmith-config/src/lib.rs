//! Configuration for planet generation.
//!
//! Settings persist to disk as RON, accept CLI overrides via clap, and are
//! validated before use. Missing fields fall back to documented defaults.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, MAX_RESOLUTION, PlanetConfig, ShellConfig, WorkerConfig,
    default_config_dir,
};
pub use error::ConfigError;
