//! Biome profile: the declarative description of one planet's terrain
//! character (noise shape, sea level, land and sea palettes).

use serde::{Deserialize, Serialize};

use crate::gradient::ColorGradient;
use crate::noise_field::LayerWeights;

/// Range the local persistence (gain) is drawn from.
///
/// The evaluator picks a point inside the range from the biome channel, so
/// rough and smooth regions alternate across the planet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainRange {
    pub min: f64,
    pub max: f64,
}

impl GainRange {
    /// A range that always yields `gain`.
    pub fn constant(gain: f64) -> Self {
        Self {
            min: gain,
            max: gain,
        }
    }

    /// Gain at `t`, with `t` clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        self.min + (self.max - self.min) * t
    }

    pub fn midpoint(&self) -> f64 {
        self.at(0.5)
    }
}

impl Default for GainRange {
    fn default() -> Self {
        Self { min: 0.45, max: 0.55 }
    }
}

/// Noise shape of a biome profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseShape {
    /// Elevation at normalized height -1, as a fraction of the unit radius.
    pub min_elevation: f64,
    /// Elevation at normalized height +1, as a fraction of the unit radius.
    pub max_elevation: f64,
    /// Octaves of the continental layer. 0 gives a perfectly flat planet.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Range the per-point persistence is drawn from.
    pub gain: GainRange,
    /// Domain warp strength. 0 disables warping.
    pub warp_strength: f64,
    /// Base frequency of the continental layer.
    pub scale: f64,
    /// Redistribution exponent applied to the composite.
    pub power: f64,
    /// Continental / mountain / hill layer weights.
    pub weights: LayerWeights,
}

impl Default for NoiseShape {
    fn default() -> Self {
        Self {
            min_elevation: -0.04,
            max_elevation: 0.08,
            octaves: 6,
            lacunarity: 2.0,
            gain: GainRange::default(),
            warp_strength: 0.15,
            scale: 1.5,
            power: 1.2,
            weights: LayerWeights::default(),
        }
    }
}

impl NoiseShape {
    /// Map a normalized height in `[-1, 1]` onto `[min_elevation, max_elevation]`.
    ///
    /// Piecewise linear around zero: height 0 is always elevation 0, +1 is
    /// `max_elevation` and -1 is `min_elevation`. Expects
    /// `min_elevation <= 0 <= max_elevation`.
    pub fn elevation_at(&self, height: f64) -> f64 {
        let h = if height.is_nan() { 0.0 } else { height.clamp(-1.0, 1.0) };
        if h >= 0.0 {
            h * self.max_elevation
        } else {
            -h * self.min_elevation
        }
    }

    /// Inverse of [`Self::elevation_at`]. A degenerate half-range maps to 0.
    pub fn height_at(&self, elevation: f64) -> f64 {
        let bound = if elevation >= 0.0 {
            self.max_elevation
        } else {
            -self.min_elevation
        };
        if bound.abs() <= f64::EPSILON || elevation.is_nan() {
            return 0.0;
        }
        (elevation / bound).clamp(-1.0, 1.0)
    }
}

/// Where the sea starts and how deep the sea floor reaches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaLevel {
    /// Normalized height below which the sea gradient applies.
    pub threshold: f64,
    /// Multiplier on depth below the sea surface. Values under 1 flatten the
    /// sea floor.
    pub depth_scale: f64,
}

impl Default for SeaLevel {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            depth_scale: 0.5,
        }
    }
}

/// Full description of one planet's terrain and palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeProfile {
    /// Human-readable profile name (e.g., "terran").
    pub name: String,
    pub shape: NoiseShape,
    pub sea_level: SeaLevel,
    /// Palette above the sea threshold, indexed by normalized height.
    pub land: ColorGradient,
    /// Palette below the sea threshold, indexed by normalized height.
    pub sea: ColorGradient,
}

impl Default for BiomeProfile {
    fn default() -> Self {
        Self::preset(super::Preset::Terran)
    }
}

impl BiomeProfile {
    /// Elevation of the sea surface.
    pub fn sea_elevation(&self) -> f64 {
        self.shape.elevation_at(self.sea_level.threshold)
    }

    /// A profile with zero elevation everywhere, keeping this profile's palette.
    pub fn flattened(mut self) -> Self {
        self.shape.min_elevation = 0.0;
        self.shape.max_elevation = 0.0;
        self.shape.octaves = 0;
        self
    }
}
