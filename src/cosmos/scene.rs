use rand::Rng;

use super::{Canvas, Color, CosmicSphere, Surface, Vec2};

/// Everything drawn in one frame: spheres painted back to front under a
/// single light.
#[derive(Debug, Clone)]
pub struct Scene {
    pub spheres: Vec<CosmicSphere>,
    pub light: Vec2,
    pub background: Color,
}

impl Scene {
    pub fn new(light: Vec2, background: Color) -> Self {
        Self {
            spheres: Vec::new(),
            light,
            background,
        }
    }

    pub fn add_sphere(&mut self, sphere: CosmicSphere) {
        self.spheres.push(sphere);
    }

    // Total chords drawn per frame across all spheres
    pub fn chord_total(&self) -> usize {
        self.spheres.iter().map(CosmicSphere::chord_count).sum()
    }

    /// Paint every sphere in order. Clearing the surface first is the
    /// owner's job, nothing from the previous frame is reused here.
    pub fn draw<S, R>(&self, surface: &mut S, rng: &mut R) -> Result<(), S::Error>
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        for sphere in &self.spheres {
            sphere.render(surface, self.light, rng)?;
        }
        Ok(())
    }

    // Clear `canvas` to the background and draw one fresh frame onto it
    pub fn paint<R: Rng + ?Sized>(&self, canvas: &mut Canvas, rng: &mut R) {
        canvas.clear(self.background);
        self.draw(canvas, rng).unwrap_or_else(|never| match never {});
    }

    pub fn snapshot<R: Rng + ?Sized>(&self, width: u32, height: u32, rng: &mut R) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        self.paint(&mut canvas, rng);
        canvas
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cosmos::RecordingSurface;

    #[test]
    fn draws_spheres_in_insertion_order() {
        let mut scene = Scene::new(Vec2(-600.0, -600.0), Color::BLACK);
        scene.add_sphere(CosmicSphere::new(50.0, Vec2(-100.0, 0.0), Color::rgb(255.0, 0.0, 0.0), 3).unwrap());
        scene.add_sphere(CosmicSphere::new(80.0, Vec2(100.0, 0.0), Color::rgb(0.0, 0.0, 255.0), 5).unwrap());

        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, &mut StdRng::seed_from_u64(5)).unwrap();

        let circles = surface.circles();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].0, Vec2(-100.0, 0.0));
        assert_eq!(circles[1].0, Vec2(100.0, 0.0));
        assert_eq!(surface.lines().len(), scene.chord_total());
        assert_eq!(scene.chord_total(), 8);
    }

    #[test]
    fn empty_scene_draws_nothing() {
        let scene = Scene::new(Vec2::ZERO, Color::BLACK);
        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn paint_does_not_keep_previous_frame() {
        let mut scene = Scene::new(Vec2(2000.0, 0.0), Color::BLACK);
        scene.add_sphere(CosmicSphere::new(20.0, Vec2::ZERO, Color(255.0, 255.0, 255.0, 255.0), 400).unwrap());
        let mut rng = StdRng::seed_from_u64(12);

        let mut canvas = Canvas::new(64, 64);
        scene.paint(&mut canvas, &mut rng);
        let first = canvas.as_raw().to_vec();
        scene.paint(&mut canvas, &mut StdRng::seed_from_u64(12));

        // Same seed again: identical pixels, nothing accumulated from the first frame
        assert_eq!(canvas.as_raw(), &first[..]);
    }
}
