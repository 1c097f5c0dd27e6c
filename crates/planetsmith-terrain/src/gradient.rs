//! Color gradients: ordered color stops, linearly interpolated.

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque black, returned by an empty gradient.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components, clamped to `[0, 1]`.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0).sanitized()
    }

    /// Color with every component clamped to `[0, 1]` and NaN mapped to 0.
    pub fn sanitized(self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self::rgba(unit(self.r), unit(self.g), unit(self.b), unit(self.a))
    }

    /// Componentwise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
        .sanitized()
    }

    /// Rec. 709 relative luminance.
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Blend toward the gray of equal luminance by `amount`.
    pub fn desaturate(self, amount: f32) -> Self {
        let l = self.luminance();
        self.lerp(Self::rgba(l, l, l, self.a), amount)
    }

    /// Blend toward white by `amount`, keeping alpha.
    pub fn lighten(self, amount: f32) -> Self {
        self.lerp(Self::rgba(1.0, 1.0, 1.0, self.a), amount)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a).sanitized()
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A single gradient stop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self {
            position,
            color: color.sanitized(),
        }
    }
}

/// Stops sorted ascending by position. Duplicate positions are allowed and
/// keep their insertion order.
///
/// Lookups below the first stop or above the last return that stop's color
/// unmodified; an empty gradient returns [`Color::BLACK`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(position, color)` pairs in any order.
    pub fn from_stops(stops: impl IntoIterator<Item = (f64, Color)>) -> Self {
        let mut gradient = Self::new();
        for (position, color) in stops {
            gradient.add(position, color);
        }
        gradient
    }

    /// Insert a stop and restore ordering.
    pub fn add(&mut self, position: f64, color: Color) -> &mut Self {
        self.stops.push(ColorStop::new(position, color));
        self.sort();
        self
    }

    fn sort(&mut self) {
        // Stable, so equal positions keep insertion order.
        self.stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Color at `position`.
    ///
    /// NaN is treated as below the first stop. Within a zero-width bracket the
    /// upper stop's color wins.
    pub fn get(&self, position: f64) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::BLACK;
        };
        if position.is_nan() || position <= first.position {
            return first.color;
        }
        if position >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if position >= lower.position && position < upper.position {
                let width = upper.position - lower.position;
                if width <= 0.0 {
                    return upper.color;
                }
                let t = (position - lower.position) / width;
                return lower.color.lerp(upper.color, t as f32);
            }
        }

        last.color
    }
}

impl From<Vec<ColorStop>> for ColorGradient {
    fn from(stops: Vec<ColorStop>) -> Self {
        let mut gradient = Self {
            stops: stops
                .into_iter()
                .map(|s| ColorStop::new(s.position, s.color))
                .collect(),
        };
        gradient.sort();
        gradient
    }
}

impl From<ColorGradient> for Vec<ColorStop> {
    fn from(gradient: ColorGradient) -> Self {
        gradient.stops
    }
}
