//! Named biome presets and seeded profile randomization.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{BiomeProfile, GainRange, NoiseShape, SeaLevel};
use crate::gradient::{Color, ColorGradient};
use crate::noise_field::LayerWeights;

/// Errors from resolving a preset by name.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// No preset has this name.
    #[error("unknown biome preset: {0}")]
    Unknown(String),
}

/// Built-in biome profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Terran,
    Arid,
    Frozen,
    Volcanic,
    Oceanic,
    Alien,
}

impl Preset {
    pub const ALL: [Self; 6] = [
        Self::Terran,
        Self::Arid,
        Self::Frozen,
        Self::Volcanic,
        Self::Oceanic,
        Self::Alien,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Terran => "terran",
            Self::Arid => "arid",
            Self::Frozen => "frozen",
            Self::Volcanic => "volcanic",
            Self::Oceanic => "oceanic",
            Self::Alien => "alien",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PresetError::Unknown(s.to_string()))
    }
}

fn gradient(stops: &[(f64, [f32; 3])]) -> ColorGradient {
    ColorGradient::from_stops(
        stops
            .iter()
            .map(|&(position, [r, g, b])| (position, Color::rgb(r, g, b))),
    )
}

impl BiomeProfile {
    /// The built-in profile for `preset`.
    pub fn preset(preset: Preset) -> Self {
        let name = preset.name().to_string();
        match preset {
            Preset::Terran => Self {
                name,
                shape: NoiseShape::default(),
                sea_level: SeaLevel::default(),
                land: gradient(&[
                    (0.0, [0.76, 0.70, 0.50]),
                    (0.08, [0.33, 0.55, 0.22]),
                    (0.35, [0.18, 0.38, 0.16]),
                    (0.6, [0.45, 0.40, 0.36]),
                    (0.85, [0.95, 0.95, 0.97]),
                ]),
                sea: gradient(&[
                    (-1.0, [0.02, 0.06, 0.22]),
                    (-0.3, [0.05, 0.20, 0.45]),
                    (0.0, [0.15, 0.45, 0.65]),
                ]),
            },
            Preset::Arid => Self {
                name,
                shape: NoiseShape {
                    min_elevation: -0.02,
                    max_elevation: 0.07,
                    warp_strength: 0.3,
                    power: 0.9,
                    weights: LayerWeights {
                        continental: 0.5,
                        mountain: 0.35,
                        hill: 0.15,
                    },
                    ..NoiseShape::default()
                },
                sea_level: SeaLevel {
                    threshold: -0.45,
                    depth_scale: 0.3,
                },
                land: gradient(&[
                    (-0.45, [0.85, 0.72, 0.48]),
                    (0.1, [0.80, 0.55, 0.30]),
                    (0.5, [0.62, 0.36, 0.20]),
                    (1.0, [0.45, 0.27, 0.18]),
                ]),
                sea: gradient(&[(-1.0, [0.10, 0.25, 0.30]), (-0.45, [0.25, 0.50, 0.50])]),
            },
            Preset::Frozen => Self {
                name,
                shape: NoiseShape {
                    max_elevation: 0.06,
                    gain: GainRange { min: 0.4, max: 0.5 },
                    power: 1.5,
                    ..NoiseShape::default()
                },
                sea_level: SeaLevel {
                    threshold: -0.1,
                    depth_scale: 0.4,
                },
                land: gradient(&[
                    (-0.1, [0.80, 0.86, 0.92]),
                    (0.3, [0.70, 0.76, 0.82]),
                    (0.7, [0.93, 0.96, 1.00]),
                ]),
                sea: gradient(&[(-1.0, [0.05, 0.12, 0.25]), (-0.1, [0.45, 0.62, 0.75])]),
            },
            Preset::Volcanic => Self {
                name,
                shape: NoiseShape {
                    min_elevation: -0.03,
                    max_elevation: 0.1,
                    gain: GainRange { min: 0.5, max: 0.65 },
                    warp_strength: 0.25,
                    power: 1.8,
                    weights: LayerWeights {
                        continental: 0.4,
                        mountain: 0.45,
                        hill: 0.15,
                    },
                    ..NoiseShape::default()
                },
                sea_level: SeaLevel {
                    threshold: -0.2,
                    depth_scale: 0.6,
                },
                land: gradient(&[
                    (-0.2, [0.12, 0.10, 0.10]),
                    (0.3, [0.22, 0.18, 0.17]),
                    (0.75, [0.40, 0.12, 0.05]),
                    (1.0, [1.00, 0.45, 0.10]),
                ]),
                sea: gradient(&[(-1.0, [0.55, 0.08, 0.02]), (-0.2, [1.00, 0.55, 0.10])]),
            },
            Preset::Oceanic => Self {
                name,
                shape: NoiseShape {
                    min_elevation: -0.06,
                    max_elevation: 0.04,
                    octaves: 5,
                    warp_strength: 0.1,
                    ..NoiseShape::default()
                },
                sea_level: SeaLevel {
                    threshold: 0.3,
                    depth_scale: 0.7,
                },
                land: gradient(&[
                    (0.3, [0.90, 0.85, 0.65]),
                    (0.45, [0.20, 0.60, 0.25]),
                    (1.0, [0.10, 0.40, 0.15]),
                ]),
                sea: gradient(&[
                    (-1.0, [0.01, 0.03, 0.15]),
                    (0.0, [0.03, 0.15, 0.40]),
                    (0.3, [0.10, 0.60, 0.70]),
                ]),
            },
            Preset::Alien => Self {
                name,
                shape: NoiseShape {
                    lacunarity: 2.3,
                    gain: GainRange { min: 0.35, max: 0.65 },
                    warp_strength: 0.45,
                    scale: 2.2,
                    ..NoiseShape::default()
                },
                sea_level: SeaLevel {
                    threshold: 0.05,
                    depth_scale: 0.5,
                },
                land: gradient(&[
                    (0.05, [0.55, 0.20, 0.60]),
                    (0.4, [0.30, 0.75, 0.55]),
                    (0.8, [0.85, 0.90, 0.30]),
                ]),
                sea: gradient(&[(-1.0, [0.20, 0.02, 0.25]), (0.05, [0.70, 0.25, 0.55])]),
            },
        }
    }

    /// Resolve a preset by name, e.g. `"terran"`.
    pub fn from_preset_name(name: &str) -> Result<Self, PresetError> {
        name.parse().map(Self::preset)
    }

    /// A random profile derived from `seed`: a random preset with its shape
    /// parameters jittered. The same seed always yields the same profile.
    pub fn randomized(seed: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        let base = Preset::ALL[rng.random_range(0..Preset::ALL.len())];
        let mut profile = Self::preset(base);

        let shape = &mut profile.shape;
        shape.lacunarity = rng.random_range(1.8..2.3);
        let gain_min = rng.random_range(0.35..0.5);
        shape.gain = GainRange {
            min: gain_min,
            max: gain_min + rng.random_range(0.0..0.15),
        };
        shape.warp_strength = rng.random_range(0.0..0.4);
        shape.power = rng.random_range(0.8..1.8);
        shape.scale = rng.random_range(1.0..2.5);
        shape.max_elevation *= rng.random_range(0.7..1.3);

        profile.name = format!("{}-{seed}", base.name());
        profile
    }
}
