//! Configuration structs with documented defaults, validation, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest supported icosphere subdivision level (~655k triangles).
pub const MAX_RESOLUTION: u32 = 8;

const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// What to generate.
    pub planet: PlanetConfig,
    /// Water and atmosphere shell settings.
    pub shells: ShellConfig,
    /// Parallel build settings.
    pub workers: WorkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Seed for every noise stream.
    pub seed: u32,
    /// Icosphere subdivision level of the base mesh.
    pub resolution: u32,
    /// Name of the built-in biome preset.
    pub preset: String,
    /// Derive a random profile from the seed instead of using `preset`.
    pub randomize: bool,
    /// RON file with a full biome profile. Takes precedence over `preset` and `randomize`.
    pub profile_path: Option<PathBuf>,
}

/// Companion shell settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Water sphere radius relative to the sea surface.
    pub water_scale: f64,
    /// Atmosphere radius relative to the highest terrain.
    pub atmosphere_scale: f64,
    /// Atmosphere opacity (0.0 - 1.0).
    pub atmosphere_opacity: f32,
}

/// Worker thread settings for mesh building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker threads (0 = one per logical CPU).
    pub threads: usize,
    /// Meshes with fewer vertices are built on a single thread.
    pub parallel_threshold: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 5,
            preset: "terran".to_string(),
            randomize: false,
            profile_path: None,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            water_scale: 1.01,
            atmosphere_scale: 1.02,
            atmosphere_opacity: 0.25,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel_threshold: 4096,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Default config directory: `<platform config dir>/planetsmith`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("planetsmith"))
}

// --- Validation ---

impl Config {
    /// Reject settings the generator cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planet.resolution > MAX_RESOLUTION {
            return Err(ConfigError::Invalid {
                field: "planet.resolution",
                reason: format!("{} exceeds maximum {MAX_RESOLUTION}", self.planet.resolution),
            });
        }
        for (field, value) in [
            ("shells.water_scale", self.shells.water_scale),
            ("shells.atmosphere_scale", self.shells.atmosphere_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.shells.atmosphere_opacity) {
            return Err(ConfigError::Invalid {
                field: "shells.atmosphere_opacity",
                reason: format!("must be in [0, 1], got {}", self.shells.atmosphere_opacity),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("seed: 42"));
        assert!(ron_str.contains("preset: \"terran\""));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(planet: (seed: 7))").unwrap();
        assert_eq!(config.planet.seed, 7);
        assert_eq!(config.planet.resolution, 5);
        assert_eq!(config.shells, ShellConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_resolution_limit_enforced() {
        let mut config = Config::default();
        config.planet.resolution = MAX_RESOLUTION + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "planet.resolution",
                ..
            }
        ));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut config = Config::default();
        config.shells.water_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.shells.atmosphere_scale = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.shells.atmosphere_opacity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.seed = 1234;
        config.planet.preset = "arid".to_string();
        config.planet.profile_path = Some(PathBuf::from("profiles/dune.ron"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(planet: (resolution: 99))").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.planet.seed = 43;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().planet.seed, 43);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
