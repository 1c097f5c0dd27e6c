//! Biome system: declarative profiles, built-in presets, and the per-point
//! evaluator that turns a profile into elevation and color.

mod evaluator;
mod preset;
mod profile;

pub use evaluator::{BiomeEvaluator, BiomeSample};
pub use preset::{Preset, PresetError};
pub use profile::{BiomeProfile, GainRange, NoiseShape, SeaLevel};
