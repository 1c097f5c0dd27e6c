//! Seeded fractal noise over the unit sphere.
//!
//! A [`NoiseField`] owns one simplex stream per [`NoiseChannel`], each seeded
//! from the planet seed plus a fixed per-channel offset. Channels share spatial
//! structure (they are sampled at the same points) but never random state, so
//! a given seed always reproduces the same streams.

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

/// Upper bound on octaves per fractal sum. Larger requests are clamped.
pub const MAX_OCTAVES: u32 = 16;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Independent scalar fields derived from a single planet seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    /// Terrain elevation.
    Height,
    /// Biome selector, also drives the local gain.
    Biome,
    /// Surface moisture.
    Moisture,
    /// River likelihood.
    River,
    /// Base temperature before latitude and altitude falloff.
    Temperature,
}

impl NoiseChannel {
    /// All channels in stream order.
    pub const ALL: [Self; 5] = [
        Self::Height,
        Self::Biome,
        Self::Moisture,
        Self::River,
        Self::Temperature,
    ];

    /// Offset added to the planet seed to derive this channel's stream seed.
    pub const fn seed_offset(self) -> u32 {
        match self {
            Self::Height => 0,
            Self::Biome => 0x9E37_79B9,
            Self::Moisture => 0x85EB_CA6B,
            Self::River => 0xC2B2_AE35,
            Self::Temperature => 0x27D4_EB2F,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Height => 0,
            Self::Biome => 1,
            Self::Moisture => 2,
            Self::River => 3,
            Self::Temperature => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Relative weights of the three layers summed into composite elevation.
///
/// Weights should sum to 1 for the composite to span `[-1, 1]`; this is not
/// enforced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerWeights {
    /// Broad continental shapes (plain fBm at the base scale).
    pub continental: f64,
    /// Ridged mountain chains.
    pub mountain: f64,
    /// Small rolling hills at high frequency.
    pub hill: f64,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            continental: 0.6,
            mountain: 0.25,
            hill: 0.15,
        }
    }
}

impl LayerWeights {
    /// Sum of all three weights.
    pub fn total(&self) -> f64 {
        self.continental + self.mountain + self.hill
    }
}

/// Shape parameters for a [`NoiseField`].
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Planet seed.
    pub seed: u32,
    /// Frequency of the first octave, in cycles per unit of sphere radius.
    pub scale: f64,
    /// Number of octaves summed by [`NoiseField::evaluate`]. Clamped to [`MAX_OCTAVES`].
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Redistribution exponent. 1.0 leaves values unchanged.
    pub exponent: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 1.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            exponent: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Noise field
// ---------------------------------------------------------------------------

/// Immutable, seeded multi-channel fractal noise generator.
///
/// Every method is a pure function of `(point, seed, parameters)`.
#[derive(Clone)]
pub struct NoiseField {
    params: NoiseParams,
    streams: [Simplex; 5],
}

impl NoiseField {
    /// Build the per-channel streams for the given parameters.
    pub fn new(mut params: NoiseParams) -> Self {
        params.octaves = params.octaves.min(MAX_OCTAVES);
        let seed = params.seed;
        let streams =
            NoiseChannel::ALL.map(|channel| Simplex::new(seed.wrapping_add(channel.seed_offset())));
        Self { params, streams }
    }

    /// Return a reference to the field parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// A single gradient-noise sample, clamped to `[-1, 1]`.
    #[inline]
    pub fn sample(&self, point: DVec3, channel: NoiseChannel) -> f64 {
        let raw = self.streams[channel.index()].get([point.x, point.y, point.z]);
        raw.clamp(-1.0, 1.0)
    }

    /// Channel value at `point` using the field's own shape parameters,
    /// redistributed by the field exponent. Result lies in `[-1, 1]`.
    pub fn evaluate(&self, point: DVec3, channel: NoiseChannel) -> f64 {
        let value = self.fractal_channel(
            point,
            channel,
            self.params.octaves,
            self.params.persistence,
            self.params.scale,
        );
        redistribute(value, self.params.exponent)
    }

    /// Normalized fBm on the height channel.
    pub fn fractal(&self, point: DVec3, octaves: u32, persistence: f64, scale: f64) -> f64 {
        self.fractal_channel(point, NoiseChannel::Height, octaves, persistence, scale)
    }

    /// Normalized fBm on any channel.
    ///
    /// Octave `i` is sampled at frequency `scale * lacunarity^i` with amplitude
    /// `persistence^i`; the sum is divided by the total amplitude so the result
    /// stays in `[-1, 1]` for any octave count. Zero octaves yields 0.
    pub fn fractal_channel(
        &self,
        point: DVec3,
        channel: NoiseChannel,
        octaves: u32,
        persistence: f64,
        scale: f64,
    ) -> f64 {
        self.accumulate(point, channel, octaves, persistence, scale, |n| n)
    }

    /// Ridged fBm: each octave contributes `1 - |noise|`. Result lies in `[0, 1]`.
    pub fn ridged(
        &self,
        point: DVec3,
        channel: NoiseChannel,
        octaves: u32,
        persistence: f64,
        scale: f64,
    ) -> f64 {
        self.accumulate(point, channel, octaves, persistence, scale, |n| {
            1.0 - n.abs()
        })
    }

    fn accumulate(
        &self,
        point: DVec3,
        channel: NoiseChannel,
        octaves: u32,
        persistence: f64,
        scale: f64,
        shape: impl Fn(f64) -> f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut frequency = scale;
        let mut amplitude = 1.0;

        for _ in 0..octaves.min(MAX_OCTAVES) {
            total += shape(self.sample(point * frequency, channel)) * amplitude;
            norm += amplitude.abs();

            frequency *= self.params.lacunarity;
            amplitude *= persistence;
        }

        if norm > 0.0 && norm.is_finite() {
            (total / norm).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Composite terrain elevation: continental fBm, ridged mountains and
    /// hills, weighted and then redistributed.
    ///
    /// The ridged layer is remapped from `[0, 1]` to `[-1, 1]` before
    /// weighting, so the composite spans `[-1, 1]` when the weights sum to 1.
    pub fn composite(&self, point: DVec3, weights: &LayerWeights, persistence: f64) -> f64 {
        let octaves = self.params.octaves;
        if octaves == 0 {
            return 0.0;
        }
        let scale = self.params.scale;
        let hill_octaves = (octaves / 2).max(1);

        let continental = self.fractal(point, octaves, persistence, scale);
        let ridges = self.ridged(point, NoiseChannel::Height, octaves, persistence, scale * 2.5);
        let mountain = 2.0 * ridges - 1.0;
        let hill = self.fractal(point, hill_octaves, persistence, scale * 6.0);

        let value = weights.continental * continental
            + weights.mountain * mountain
            + weights.hill * hill;
        redistribute(value, self.params.exponent)
    }

    /// Offset `point` by a low-frequency vector field sampled from the height
    /// stream. A `strength` of zero returns the point unchanged.
    pub fn warp(&self, point: DVec3, strength: f64) -> DVec3 {
        if strength == 0.0 {
            return point;
        }
        let p = point * self.params.scale;
        let offset = DVec3::new(
            self.sample(p + DVec3::new(17.3, 0.0, 0.0), NoiseChannel::Height),
            self.sample(p + DVec3::new(0.0, 41.9, 0.0), NoiseChannel::Height),
            self.sample(p + DVec3::new(0.0, 0.0, 73.1), NoiseChannel::Height),
        );
        point + offset * strength
    }
}

/// Power-law reshaping that preserves sign: `|x|^exponent * sign(x)`.
///
/// Exponents above 1 sharpen extremes, below 1 flatten them. Non-positive or
/// non-finite exponents leave the value unchanged.
#[inline]
pub fn redistribute(value: f64, exponent: f64) -> f64 {
    if exponent == 1.0 || exponent <= 0.0 || !exponent.is_finite() {
        return value;
    }
    value.abs().powf(exponent).copysign(value)
}

/// `count` points spread evenly over the unit sphere (Fibonacci lattice).
pub fn sphere_samples(count: usize) -> Vec<DVec3> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / count as f64;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            DVec3::new(r * theta.cos(), y, r * theta.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u32) -> NoiseField {
        NoiseField::new(NoiseParams {
            seed,
            ..Default::default()
        })
    }

    #[test]
    fn test_fractal_deterministic_for_seed_42() {
        let a = field(42);
        let b = field(42);
        let point = DVec3::X;

        let e1 = a.fractal(point, 4, 0.5, 1.0);
        let e2 = b.fractal(point, 4, 0.5, 1.0);
        assert_eq!(
            e1.to_bits(),
            e2.to_bits(),
            "Same seed and parameters must reproduce elevation exactly: {e1} vs {e2}"
        );
    }

    #[test]
    fn test_seed_change_changes_value() {
        let point = DVec3::X;
        let e42 = field(42).fractal(point, 4, 0.5, 1.0);
        let e43 = field(43).fractal(point, 4, 0.5, 1.0);
        assert_ne!(e42, e43, "Seed 42 and 43 should produce different values");
    }

    #[test]
    fn test_fractal_normalized_for_all_octave_counts() {
        let points = sphere_samples(10_000);
        for octaves in 1..=8 {
            let f = NoiseField::new(NoiseParams {
                seed: 7,
                octaves,
                ..Default::default()
            });
            for &p in &points {
                let v = f.fractal(p, octaves, 0.5, 1.0);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "fBm with {octaves} octaves out of range at {p:?}: {v}"
                );
            }
        }
    }

    #[test]
    fn test_ridged_in_unit_interval() {
        let f = field(3);
        for p in sphere_samples(2_000) {
            let v = f.ridged(p, NoiseChannel::Height, 5, 0.5, 2.0);
            assert!((0.0..=1.0).contains(&v), "Ridged value out of [0, 1]: {v}");
        }
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let f = NoiseField::new(NoiseParams {
            seed: 9,
            octaves: 0,
            ..Default::default()
        });
        let p = DVec3::new(0.3, -0.4, 0.866).normalize();
        assert_eq!(f.fractal(p, 0, 0.5, 1.0), 0.0);
        assert_eq!(f.ridged(p, NoiseChannel::Height, 0, 0.5, 1.0), 0.0);
        assert_eq!(f.composite(p, &LayerWeights::default(), 0.5), 0.0);
        for channel in NoiseChannel::ALL {
            assert_eq!(f.evaluate(p, channel), 0.0);
        }
    }

    #[test]
    fn test_channels_are_decorrelated() {
        let f = field(1234);
        let points = sphere_samples(500);
        let differing = points
            .iter()
            .filter(|&&p| {
                (f.evaluate(p, NoiseChannel::Height) - f.evaluate(p, NoiseChannel::Moisture)).abs()
                    > 1e-9
            })
            .count();
        assert!(
            differing > 450,
            "Height and moisture channels should differ almost everywhere, only {differing}/500 did"
        );
    }

    #[test]
    fn test_composite_within_range_for_unit_weights() {
        let f = NoiseField::new(NoiseParams {
            seed: 77,
            octaves: 6,
            exponent: 1.4,
            ..Default::default()
        });
        let weights = LayerWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
        for p in sphere_samples(3_000) {
            let v = f.composite(p, &weights, 0.5);
            assert!(
                (-1.0..=1.0).contains(&v),
                "Composite elevation out of range: {v}"
            );
        }
    }

    #[test]
    fn test_redistribution_shape() {
        assert_eq!(redistribute(0.5, 1.0), 0.5);
        assert!((redistribute(0.5, 2.0) - 0.25).abs() < 1e-12);
        assert!((redistribute(-0.5, 2.0) + 0.25).abs() < 1e-12);
        assert!(redistribute(0.25, 0.5) > 0.25, "Exponent < 1 should flatten toward 1");
        assert_eq!(redistribute(0.3, 0.0), 0.3);
        assert_eq!(redistribute(0.3, f64::NAN), 0.3);
    }

    #[test]
    fn test_octaves_clamped() {
        let f = NoiseField::new(NoiseParams {
            octaves: 1_000,
            ..Default::default()
        });
        assert_eq!(f.params().octaves, MAX_OCTAVES);
    }

    #[test]
    fn test_warp_zero_strength_is_identity() {
        let f = field(5);
        let p = DVec3::new(0.0, 0.6, 0.8);
        assert_eq!(f.warp(p, 0.0), p);
        assert_ne!(f.warp(p, 0.3), p);
    }

    #[test]
    fn test_sphere_samples_are_unit_length() {
        let points = sphere_samples(1_000);
        assert_eq!(points.len(), 1_000);
        for p in points {
            assert!((p.length() - 1.0).abs() < 1e-12, "Sample not on unit sphere: {p:?}");
        }
    }
}
