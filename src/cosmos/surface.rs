use super::{Color, Vec2};

/// How drawn pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over alpha compositing
    #[default]
    Normal,
    /// dst += src * (src_alpha / 255), saturating
    Additive,
}

/// The drawing capabilities a sphere needs from whatever it paints onto.
///
/// State setters (blend, fill, stroke) cannot fail. The two primitives return
/// the surface's own error type so callers can forward it untouched.
pub trait Surface {
    type Error;

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn fill(&mut self, color: Color);

    fn no_fill(&mut self);

    fn stroke(&mut self, color: Color);

    fn stroke_weight(&mut self, weight: f32);

    // Filled circle using the current fill; nothing is drawn when fill is off
    fn circle(&mut self, center: Vec2, diameter: f32) -> Result<(), Self::Error>;

    // Line segment using the current stroke color and weight
    fn line(&mut self, from: Vec2, to: Vec2) -> Result<(), Self::Error>;
}
