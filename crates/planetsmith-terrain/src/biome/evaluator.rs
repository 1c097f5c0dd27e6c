//! Biome evaluator: composes the noise field and a profile into elevation
//! and color for any point on the unit sphere.

use glam::DVec3;

use super::BiomeProfile;
use crate::gradient::Color;
use crate::noise_field::{NoiseChannel, NoiseField, NoiseParams};

/// Everything the evaluator knows about one surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeSample {
    /// Radial displacement as a fraction of the unit radius.
    pub elevation: f64,
    /// Normalized height in `[-1, 1]`, the gradient lookup key.
    pub height: f64,
    /// Surface color from the land or sea gradient.
    pub color: Color,
    /// `true` when the point lies below the sea threshold.
    pub submerged: bool,
    /// Biome selector in `[-1, 1]`.
    pub biome: f64,
    /// Moisture in `[-1, 1]`.
    pub moisture: f64,
    /// River likelihood in `[-1, 1]`.
    pub river: f64,
    /// Temperature in `[-1, 1]`, cooler toward the poles and at altitude.
    pub temperature: f64,
}

/// Pure, immutable per-point terrain evaluation.
///
/// Normalized height is bounded analytically: the composite noise is already
/// confined to `[-1, 1]`, so no running min/max is tracked and evaluation
/// order never matters.
#[derive(Clone)]
pub struct BiomeEvaluator {
    noise: NoiseField,
    profile: BiomeProfile,
    seed: u32,
}

impl BiomeEvaluator {
    /// Create an evaluator for `seed` and `profile`.
    pub fn new(seed: u32, profile: BiomeProfile) -> Self {
        let shape = &profile.shape;
        let noise = NoiseField::new(NoiseParams {
            seed,
            scale: shape.scale,
            octaves: shape.octaves,
            persistence: shape.gain.midpoint(),
            lacunarity: shape.lacunarity,
            exponent: shape.power,
        });
        Self {
            noise,
            profile,
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn profile(&self) -> &BiomeProfile {
        &self.profile
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Elevation of the sea surface for this evaluator's profile.
    pub fn sea_elevation(&self) -> f64 {
        self.profile.sea_elevation()
    }

    /// Evaluate the surface at a unit-length `point`.
    pub fn evaluate(&self, point: DVec3) -> BiomeSample {
        let shape = &self.profile.shape;
        let sea = &self.profile.sea_level;

        // Auxiliary channels are always computed so every call does the same work.
        let biome = self.noise.evaluate(point, NoiseChannel::Biome);
        let moisture = self.noise.evaluate(point, NoiseChannel::Moisture);
        let river = self.noise.evaluate(point, NoiseChannel::River);

        let persistence = shape.gain.at((biome + 1.0) * 0.5);
        let warped = self.noise.warp(point, shape.warp_strength);
        let height = self
            .noise
            .composite(warped, &shape.weights, persistence)
            .clamp(-1.0, 1.0);

        let raw_elevation = shape.elevation_at(height);
        let submerged = height < sea.threshold;
        let (elevation, color) = if submerged {
            // A shape without octaves stays on the unit sphere, sea or not.
            let elevation = if shape.octaves == 0 {
                0.0
            } else {
                let sea_elevation = self.profile.sea_elevation();
                let depth_scale = sea.depth_scale.max(0.0);
                sea_elevation + (raw_elevation - sea_elevation) * depth_scale
            };
            (elevation, self.profile.sea.get(height))
        } else {
            (raw_elevation, self.profile.land.get(height))
        };

        let temperature = self.temperature(point, height);

        BiomeSample {
            elevation,
            height,
            color,
            submerged,
            biome,
            moisture,
            river,
            temperature,
        }
    }

    fn temperature(&self, point: DVec3, height: f64) -> f64 {
        let base = self.noise.evaluate(point, NoiseChannel::Temperature);
        let latitude = point.y.abs().min(1.0);
        let altitude = (height - self.profile.sea_level.threshold).max(0.0);
        (0.7 * (1.0 - 2.0 * latitude) + 0.3 * base - 0.5 * altitude).clamp(-1.0, 1.0)
    }
}
