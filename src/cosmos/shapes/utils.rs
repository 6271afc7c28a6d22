use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);

    // Point on a circle of the given radius around `center`, at `angle` radians
    pub fn on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
        Vec2(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
    }

    // Add two vectors
    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2(self.0 + other.0, self.1 + other.1)
    }

    // Subtract two vectors
    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2(self.0 - other.0, self.1 - other.1)
    }

    // Divide each component of the vector by a scalar
    pub fn div(self, scalar: f32) -> Vec2 {
        Vec2(self.0 / scalar, self.1 / scalar)
    }

    // Multiply vector by a scalar
    pub fn mul(self, scalar: f32) -> Vec2 {
        Vec2(self.0 * scalar, self.1 * scalar)
    }

    // Dot product of two vectors
    pub fn dot(self, other: Vec2) -> f32 {
        self.0 * other.0 + self.1 * other.1
    }

    // Magnitude (length) of the vector
    pub fn magnitude(self) -> f32 {
        f32::sqrt(self.dot(self))
    }

    // Euclidean distance between two points
    pub fn distance(self, other: Vec2) -> f32 {
        self.sub(other).magnitude()
    }

    // Point halfway between two points
    pub fn midpoint(self, other: Vec2) -> Vec2 {
        self.add(other).div(2.0)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Self) -> Self::Output {
        Vec2::add(self, other)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Self) -> Self::Output {
        Vec2::sub(self, other)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f32) -> Self::Output {
        Vec2::mul(self, scalar)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, scalar: f32) -> Self::Output {
        Vec2::div(self, scalar)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Vec2(v[0], v[1])
    }
}

/// RGBA color with every channel in the 0..=255 range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 255.0);

    pub fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color(r, g, b, 255.0)
    }

    pub fn red(self) -> f32 {
        self.0
    }

    pub fn green(self) -> f32 {
        self.1
    }

    pub fn blue(self) -> f32 {
        self.2
    }

    pub fn alpha(self) -> f32 {
        self.3
    }

    pub fn channels(self) -> [f32; 4] {
        [self.0, self.1, self.2, self.3]
    }

    // Every channel finite and inside 0..=255
    pub fn is_valid(self) -> bool {
        self.channels()
            .iter()
            .all(|c| c.is_finite() && (0.0..=255.0).contains(c))
    }

    // Quantize to 8-bit channels, rounding and saturating
    pub fn to_rgba8(self) -> [u8; 4] {
        self.channels().map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color(c[0], c[1], c[2], c[3])
    }
}

/// Linearly re-maps `value` from `from` onto `to`. The input is clamped to the
/// source range first, so the result always lies between `to.0` and `to.1`.
/// A zero-width source range maps everything onto `to.0`.
pub fn map_range(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let (lo, hi) = if from.0 <= from.1 { (from.0, from.1) } else { (from.1, from.0) };
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    let t = (value.clamp(lo, hi) - from.0) / span;
    to.0 + (to.1 - to.0) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_midpoint() {
        let a = Vec2(0.0, 0.0);
        let b = Vec2(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Vec2(1.5, 2.0));
    }

    #[test]
    fn points_on_circle_sit_at_radius() {
        let center = Vec2(10.0, -4.0);
        for i in 0..16 {
            let angle = i as f32 * 0.4;
            let p = Vec2::on_circle(center, 7.5, angle);
            assert!((p.distance(center) - 7.5).abs() < 1e-4);
        }
    }

    #[test]
    fn map_range_clamps_input() {
        assert_eq!(map_range(-10.0, (0.0, 200.0), (1.0, 0.3)), 1.0);
        assert!((map_range(400.0, (0.0, 200.0), (1.0, 0.3)) - 0.3).abs() < 1e-6);
        assert!((map_range(100.0, (0.0, 200.0), (1.0, 0.3)) - 0.65).abs() < 1e-6);
        assert_eq!(map_range(900.0, (600.0, 1200.0), (0.0, 1.0)), 0.5);
    }

    #[test]
    fn map_range_handles_empty_source() {
        assert_eq!(map_range(5.0, (0.0, 0.0), (1.0, 0.3)), 1.0);
    }

    #[test]
    fn color_validation() {
        assert!(Color(255.0, 0.0, 255.0, 200.0).is_valid());
        assert!(!Color(256.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Color(0.0, f32::NAN, 0.0, 0.0).is_valid());
        assert_eq!(Color(254.6, 0.4, 300.0, -2.0).to_rgba8(), [255, 0, 255, 0]);
    }
}
