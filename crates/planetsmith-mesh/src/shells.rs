//! Water and atmosphere shells surrounding the displaced ground mesh.

use planetsmith_terrain::{BiomeProfile, Color};

/// Static translucent shell drawn around the planet, back faces only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereShell {
    /// Shell radius in unit-sphere units.
    pub radius: f64,
    /// Shell tint.
    pub color: Color,
    /// Shell opacity in `[0, 1]`.
    pub opacity: f32,
}

impl AtmosphereShell {
    /// Derive the shell for `profile`.
    ///
    /// The radius clears the highest possible terrain by `scale`; the color is
    /// the shallow-sea color, half desaturated and lightened toward white.
    pub fn from_profile(profile: &BiomeProfile, scale: f64, opacity: f32) -> Self {
        let peak = 1.0 + profile.shape.max_elevation.max(0.0);
        Self {
            radius: peak * scale,
            color: atmosphere_color(profile),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Shallow-sea color, desaturated 50% and lightened 30%.
pub fn atmosphere_color(profile: &BiomeProfile) -> Color {
    profile
        .sea
        .get(profile.sea_level.threshold)
        .desaturate(0.5)
        .lighten(0.3)
}

/// Uniform water color: the sea gradient at the sea threshold.
pub fn water_color(profile: &BiomeProfile) -> Color {
    profile.sea.get(profile.sea_level.threshold)
}

/// Radius of the water sphere: the sea surface scaled by `scale` so it never
/// sits coplanar with shoreline terrain.
pub fn water_radius(profile: &BiomeProfile, scale: f64) -> f64 {
    ((1.0 + profile.sea_elevation()) * scale).max(0.0)
}
