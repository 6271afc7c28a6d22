use rand::Rng;

use super::{map_range, Color, Vec2};
use crate::cosmos::{BlendMode, CosmosError, Surface};

// Chord length maps onto this alpha band: short chords opaque, diameters faint
const LENGTH_ALPHA_RANGE: (f32, f32) = (1.0, 0.3);
// Midpoints closer than the near distance get no light, beyond the far one full light
const LIGHT_NEAR: f32 = 600.0;
const LIGHT_FAR: f32 = 1200.0;
const CHORD_WEIGHT: f32 = 1.0;

/// A glowing sphere: an occluding black disc overdrawn with random chords
/// that are lit by their distance to a light.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicSphere {
    radius: f32,
    center: Vec2,
    color: Color,
    chord_count: usize,
}

/// Lighting terms for one chord, kept separate so they can be inspected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordShade {
    pub length_alpha: f32,
    pub light_alpha: f32,
    pub combined_alpha: f32,
    pub color: Color,
}

impl CosmicSphere {
    // Sphere constructor, rejecting configurations that cannot be drawn
    pub fn new(radius: f32, center: Vec2, color: Color, chord_count: usize) -> Result<Self, CosmosError> {
        if !radius.is_finite() || radius <= 0.0 || !(radius * 2.0).is_finite() {
            return Err(CosmosError::InvalidRadius(radius));
        }
        // Chord endpoints sit around the doubled center; their distances must stay finite too
        let reach = Vec2((center.0 * 2.0).abs() + radius, (center.1 * 2.0).abs() + radius) * 2.0;
        if !center.is_finite() || !reach.is_finite() {
            return Err(CosmosError::InvalidCenter);
        }
        if !color.is_valid() {
            return Err(CosmosError::InvalidColor(format!(
                "channels must be within 0..=255, got {:?}",
                color.channels()
            )));
        }

        Ok(Self { radius, center, color, chord_count })
    }

    // Same as `new` but accepts a signed chord count as read from a scene file
    pub fn with_signed_chords(radius: f32, center: Vec2, color: Color, chord_count: i64) -> Result<Self, CosmosError> {
        let chord_count = usize::try_from(chord_count)
            .map_err(|_| CosmosError::NegativeChordCount(chord_count))?;
        Self::new(radius, center, color, chord_count)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn chord_count(&self) -> usize {
        self.chord_count
    }

    /// Center of the circle chord endpoints are sampled on. It is twice the
    /// stored center, while the occluding disc sits at the stored center.
    pub fn chord_center(&self) -> Vec2 {
        self.center * 2.0
    }

    // Uniform point on the chord circle
    pub fn sample_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        Vec2::on_circle(self.chord_center(), self.radius, angle)
    }

    /// Alpha and color for a chord between `p1` and `p2` under `light`.
    pub fn shade_chord(&self, p1: Vec2, p2: Vec2, light: Vec2) -> ChordShade {
        let length_alpha = map_range(p1.distance(p2), (0.0, 2.0 * self.radius), LENGTH_ALPHA_RANGE)
            .clamp(LENGTH_ALPHA_RANGE.1, LENGTH_ALPHA_RANGE.0);

        let light_distance = p1.midpoint(p2).distance(light);
        let light_alpha = map_range(light_distance, (LIGHT_NEAR, LIGHT_FAR), (0.0, 1.0)).clamp(0.0, 1.0);

        let combined_alpha = light_alpha * length_alpha;
        let color = Color(
            self.color.red(),
            self.color.green() * (1.0 - combined_alpha),
            self.color.blue(),
            self.color.alpha() * combined_alpha,
        );

        ChordShade { length_alpha, light_alpha, combined_alpha, color }
    }

    /// Paint the sphere onto `surface`. Blend and fill state are left as the
    /// chords need them; restoring them is up to the caller.
    pub fn render<S, R>(&self, surface: &mut S, light: Vec2, rng: &mut R) -> Result<(), S::Error>
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        surface.set_blend_mode(BlendMode::Normal);
        surface.fill(Color::BLACK);
        surface.circle(self.center, self.radius * 2.0)?;

        surface.set_blend_mode(BlendMode::Additive);
        surface.no_fill();

        for _ in 0..self.chord_count {
            let p1 = self.sample_edge(rng);
            let p2 = self.sample_edge(rng);
            let shade = self.shade_chord(p1, p2, light);

            surface.stroke(shade.color);
            surface.stroke_weight(CHORD_WEIGHT);
            surface.line(p1, p2)?;
        }

        Ok(())
    }
}
