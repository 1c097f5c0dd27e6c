//! Headless demo that generates one planet and logs its statistics.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p planetsmith-demo -- --seed 7 --preset volcanic`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use planetsmith_config::{CliArgs, Config, ConfigError, PlanetConfig};
use planetsmith_mesh::{BaseMesh, BuildSettings, TerrainMeshBuilder, TopologyError};
use planetsmith_terrain::{BiomeEvaluator, BiomeProfile, PresetError};
use tracing::{error, info, warn};

/// Anything that stops the demo from producing a planet.
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("no config directory available on this platform; pass --config")]
    NoConfigDir,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error("failed to read profile {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    ProfileParse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Load a biome profile from a RON file.
fn load_profile(path: &Path) -> Result<BiomeProfile, DemoError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DemoError::ProfileRead {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| DemoError::ProfileParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Profile file first, then a seed-derived random profile, then the named preset.
fn resolve_profile(planet: &PlanetConfig) -> Result<BiomeProfile, DemoError> {
    if let Some(path) = &planet.profile_path {
        return load_profile(path);
    }
    if planet.randomize {
        return Ok(BiomeProfile::randomized(planet.seed));
    }
    Ok(BiomeProfile::from_preset_name(&planet.preset)?)
}

fn build_settings(config: &Config) -> BuildSettings {
    BuildSettings {
        water_scale: config.shells.water_scale,
        atmosphere_scale: config.shells.atmosphere_scale,
        atmosphere_opacity: config.shells.atmosphere_opacity,
        threads: config.workers.threads,
        parallel_threshold: config.workers.parallel_threshold,
    }
}

fn run(config: &Config) -> Result<(), DemoError> {
    config.validate()?;

    let profile = resolve_profile(&config.planet)?;
    info!(
        profile = %profile.name,
        seed = config.planet.seed,
        resolution = config.planet.resolution,
        "Generating planet"
    );

    let base = BaseMesh::icosphere(config.planet.resolution);
    let evaluator = BiomeEvaluator::new(config.planet.seed, profile);
    let planet = TerrainMeshBuilder::new(build_settings(config)).build(&base, &evaluator)?;

    let stats = planet.stats();
    info!(
        vertices = stats.vertex_count,
        triangles = stats.triangle_count,
        min_radius = stats.min_radius,
        max_radius = stats.max_radius,
        land_fraction = stats.land_fraction,
        "Planet generated"
    );
    info!(
        water_radius = 1.0 + planet.water_level_offset,
        atmosphere_radius = planet.atmosphere.radius,
        atmosphere_opacity = planet.atmosphere.opacity,
        ground_bytes = planet.ground.byte_size(),
        "Shells"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args
        .config
        .clone()
        .or_else(planetsmith_config::default_config_dir)
    else {
        eprintln!("{}", DemoError::NoConfigDir);
        return ExitCode::FAILURE;
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    planetsmith_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if config.planet.profile_path.is_some() && config.planet.randomize {
        warn!("--profile takes precedence over --randomize");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("planetsmith: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetsmith_terrain::Preset;

    #[test]
    fn test_preset_resolved_by_name() {
        let planet = PlanetConfig {
            preset: "Volcanic".to_string(),
            ..Default::default()
        };
        let profile = resolve_profile(&planet).unwrap();
        assert_eq!(profile, BiomeProfile::preset(Preset::Volcanic));
    }

    #[test]
    fn test_unknown_preset_is_error() {
        let planet = PlanetConfig {
            preset: "gas-giant".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            resolve_profile(&planet),
            Err(DemoError::Preset(PresetError::Unknown(_)))
        ));
    }

    #[test]
    fn test_randomize_uses_seed() {
        let planet = PlanetConfig {
            seed: 99,
            randomize: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_profile(&planet).unwrap(),
            BiomeProfile::randomized(99)
        );
    }

    #[test]
    fn test_profile_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ron");
        let mut custom = BiomeProfile::preset(Preset::Frozen);
        custom.name = "custom".to_string();
        let serialized = ron::ser::to_string(&custom).unwrap();
        std::fs::write(&path, serialized).unwrap();

        let planet = PlanetConfig {
            randomize: true,
            profile_path: Some(path),
            ..Default::default()
        };
        let profile = resolve_profile(&planet).unwrap();
        assert_eq!(profile.name, "custom");
    }

    #[test]
    fn test_missing_profile_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let planet = PlanetConfig {
            profile_path: Some(dir.path().join("absent.ron")),
            ..Default::default()
        };
        assert!(matches!(
            resolve_profile(&planet),
            Err(DemoError::ProfileRead { .. })
        ));
    }

    #[test]
    fn test_malformed_profile_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(shape: (octaves: \"many\"))").unwrap();
        let planet = PlanetConfig {
            profile_path: Some(path),
            ..Default::default()
        };
        assert!(matches!(
            resolve_profile(&planet),
            Err(DemoError::ProfileParse { .. })
        ));
    }

    #[test]
    fn test_run_small_planet() {
        let mut config = Config::default();
        config.planet.resolution = 1;
        assert!(run(&config).is_ok());
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let mut config = Config::default();
        config.shells.water_scale = -1.0;
        assert!(matches!(run(&config), Err(DemoError::Config(_))));
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = Config::default();
        config.workers.threads = 3;
        config.shells.atmosphere_opacity = 0.5;
        let settings = build_settings(&config);
        assert_eq!(settings.threads, 3);
        assert_eq!(settings.atmosphere_opacity, 0.5);
    }
}
