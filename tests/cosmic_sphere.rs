//! End-to-end checks: a sphere rendered onto the recording surface and onto a
//! real pixel canvas.

use cosmic_sphere::cosmos::{
    BlendMode, Canvas, Color, CosmicSphere, DrawCommand, RecordingSurface, SceneConfig, Surface, Vec2,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Surface that fails on the n-th line, to check errors reach the caller.
struct FailingSurface {
    lines_left: usize,
}

#[derive(Debug, PartialEq)]
struct OutOfInk;

impl Surface for FailingSurface {
    type Error = OutOfInk;

    fn set_blend_mode(&mut self, _mode: BlendMode) {}
    fn fill(&mut self, _color: Color) {}
    fn no_fill(&mut self) {}
    fn stroke(&mut self, _color: Color) {}
    fn stroke_weight(&mut self, _weight: f32) {}

    fn circle(&mut self, _center: Vec2, _diameter: f32) -> Result<(), OutOfInk> {
        Ok(())
    }

    fn line(&mut self, _from: Vec2, _to: Vec2) -> Result<(), OutOfInk> {
        if self.lines_left == 0 {
            return Err(OutOfInk);
        }
        self.lines_left -= 1;
        Ok(())
    }
}

#[test]
fn magenta_sphere_with_light_at_centre() {
    let sphere = CosmicSphere::new(100.0, Vec2(0.0, 0.0), Color(255.0, 0.0, 255.0, 200.0), 50).unwrap();
    let light = Vec2(0.0, 0.0);
    let mut surface = RecordingSurface::new();
    sphere
        .render(&mut surface, light, &mut StdRng::seed_from_u64(2024))
        .unwrap();

    // Normal blend, black fill, then the disc
    assert_eq!(
        &surface.commands()[..3],
        &[
            DrawCommand::BlendMode(BlendMode::Normal),
            DrawCommand::Fill(Some(Color::BLACK)),
            DrawCommand::Circle {
                center: Vec2(0.0, 0.0),
                diameter: 200.0,
                fill: Some(Color::BLACK),
                blend: BlendMode::Normal,
            },
        ]
    );

    let lines = surface.lines();
    assert_eq!(lines.len(), 50);
    for line in lines {
        let stroke = line.stroke.unwrap();
        assert!(stroke.alpha() <= 200.0);
        // Every midpoint is within the radius of the light, far inside the dark zone
        assert!(line.from.midpoint(line.to).distance(light) <= 100.0 + 1e-3);
        assert_eq!(stroke.alpha(), 0.0);
        assert_eq!(stroke.red(), 255.0);
        assert_eq!(stroke.blue(), 255.0);
    }
}

#[test]
fn surface_errors_propagate() {
    let sphere = CosmicSphere::new(10.0, Vec2::ZERO, Color::BLACK, 5).unwrap();
    let mut surface = FailingSurface { lines_left: 2 };
    let result = sphere.render(&mut surface, Vec2::ZERO, &mut StdRng::seed_from_u64(0));
    assert_eq!(result, Err(OutOfInk));
}

#[test]
fn lit_sphere_glows_on_canvas() {
    let sphere = CosmicSphere::new(40.0, Vec2::ZERO, Color(255.0, 255.0, 255.0, 255.0), 500).unwrap();
    let mut canvas = Canvas::new(100, 100);
    canvas.clear(Color(0.0, 0.0, 80.0, 255.0));
    sphere
        .render(&mut canvas, Vec2(5000.0, 0.0), &mut StdRng::seed_from_u64(8))
        .unwrap();

    // Outside the disc the background is untouched
    assert_eq!(canvas.pixel(2, 2), Some([0, 0, 80, 255]));

    // Inside, the fully lit chords add red and blue over the black disc
    let lit = (0..100u32)
        .flat_map(|y| (0..100u32).map(move |x| (x, y)))
        .filter_map(|(x, y)| canvas.pixel(x, y))
        .filter(|p| p[0] > 0 && p[2] != 80)
        .count();
    assert!(lit > 100, "expected chords on the disc, got {lit} lit pixels");
}

#[test]
fn dark_light_leaves_only_the_disc() {
    let sphere = CosmicSphere::new(30.0, Vec2::ZERO, Color(255.0, 255.0, 255.0, 255.0), 300).unwrap();
    let mut canvas = Canvas::new(80, 80);
    canvas.clear(Color(255.0, 255.0, 255.0, 255.0));
    sphere
        .render(&mut canvas, Vec2::ZERO, &mut StdRng::seed_from_u64(4))
        .unwrap();

    // Chords have zero alpha, so the disc stays black
    assert_eq!(canvas.pixel(40, 40), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(50, 40), Some([0, 0, 0, 255]));
}

#[test]
fn snapshot_saves_png() {
    let config = SceneConfig::from_toml(
        r#"
        width = 64
        height = 48
        seed = 1
        light = [-600.0, -600.0]

        [[spheres]]
        radius = 20.0
        chord_count = 100
        "#,
    )
    .unwrap();
    let scene = config.build_scene().unwrap();
    let canvas = scene.snapshot(config.width, config.height, &mut StdRng::seed_from_u64(1));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    canvas.save(&path).unwrap();

    let loaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(loaded.dimensions(), (64, 48));
    assert_eq!(loaded.as_raw(), canvas.as_raw());
}
