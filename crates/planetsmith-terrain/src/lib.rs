//! Procedural planet terrain: seeded multi-channel fractal noise, color
//! gradients, biome profiles, and per-point biome evaluation.

mod gradient;
mod noise_field;

pub mod biome;

pub use biome::{
    BiomeEvaluator, BiomeProfile, BiomeSample, GainRange, NoiseShape, Preset, PresetError,
    SeaLevel,
};
pub use gradient::{Color, ColorGradient, ColorStop};
pub use noise_field::{
    LayerWeights, MAX_OCTAVES, NoiseChannel, NoiseField, NoiseParams, redistribute,
    sphere_samples,
};
