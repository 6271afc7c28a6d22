use std::collections::HashSet;
use std::convert::Infallible;
use std::path::Path;

use image::{Rgba, RgbaImage};

use super::{BlendMode, Color, CosmosError, Surface, Vec2};

/// Software raster surface backed by an RGBA8 image.
///
/// World coordinates are offset by `origin`, so with the default origin the
/// world point (0, 0) lands in the middle of the image.
pub struct Canvas {
    image: RgbaImage,
    origin: Vec2,
    blend: BlendMode,
    fill: Option<Color>,
    stroke: Option<Color>,
    weight: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_origin(width, height, Vec2(width as f32 / 2.0, height as f32 / 2.0))
    }

    pub fn with_origin(width: u32, height: u32, origin: Vec2) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            origin,
            blend: BlendMode::Normal,
            fill: Some(Color(255.0, 255.0, 255.0, 255.0)),
            stroke: Some(Color::BLACK),
            weight: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    // Overwrite every pixel, ignoring the blend mode
    pub fn clear(&mut self, color: Color) {
        let pixel = Rgba(color.to_rgba8());
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    // Tightly packed RGBA8 rows, ready for a texture upload
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    // Format is picked from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CosmosError> {
        self.image.save(path)?;
        Ok(())
    }

    fn to_pixel_space(&self, p: Vec2) -> Vec2 {
        p + self.origin
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let [dr, dg, db, da] = dst.0.map(|c| c as f32);
        let a = (color.alpha() / 255.0).clamp(0.0, 1.0);

        let out = match self.blend {
            BlendMode::Normal => Color(
                color.red() * a + dr * (1.0 - a),
                color.green() * a + dg * (1.0 - a),
                color.blue() * a + db * (1.0 - a),
                color.alpha() + da * (1.0 - a),
            ),
            BlendMode::Additive => Color(
                dr + color.red() * a,
                dg + color.green() * a,
                db + color.blue() * a,
                da + color.alpha(),
            ),
        };
        dst.0 = out.to_rgba8();
    }

    // Pixels covered by a square stamp of `size` centred on a pixel-space point
    fn stamp_footprint(p: Vec2, size: f32) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        if size <= 1.0 {
            let (x, y) = (p.0.floor() as i64, p.1.floor() as i64);
            return (x..x + 1, y..y + 1);
        }
        let half = size / 2.0;
        let xs = (p.0 - half).round() as i64..(p.0 + half).round() as i64;
        let ys = (p.1 - half).round() as i64..(p.1 + half).round() as i64;
        (xs, ys)
    }

    /// Liang-Barsky clip of a pixel-space segment against the image grown by
    /// `margin`. Returns the visible part, or None when it is fully outside.
    fn clip_segment(&self, a: Vec2, b: Vec2, margin: f32) -> Option<(Vec2, Vec2)> {
        let (xmin, ymin) = (-margin, -margin);
        let (xmax, ymax) = (self.width() as f32 + margin, self.height() as f32 + margin);
        let d = b - a;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;

        for (p, q) in [
            (-d.0, a.0 - xmin),
            (d.0, xmax - a.0),
            (-d.1, a.1 - ymin),
            (d.1, ymax - a.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((a + d * t0, a + d * t1))
    }
}

impl Surface for Canvas {
    type Error = Infallible;

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill(&mut self, color: Color) {
        self.fill = Some(color);
    }

    fn no_fill(&mut self) {
        self.fill = None;
    }

    fn stroke(&mut self, color: Color) {
        self.stroke = Some(color);
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    fn circle(&mut self, center: Vec2, diameter: f32) -> Result<(), Infallible> {
        let Some(color) = self.fill else {
            return Ok(());
        };
        let radius = diameter / 2.0;
        if radius.is_nan() || radius <= 0.0 {
            return Ok(());
        }

        let c = self.to_pixel_space(center);
        let y_start = ((c.1 - radius).floor() as i64).max(0);
        let y_end = ((c.1 + radius).ceil() as i64).min(self.height() as i64);

        // Horizontal spans over every pixel whose centre is inside the circle
        for y in y_start..y_end {
            let dy = y as f32 + 0.5 - c.1;
            let span = radius * radius - dy * dy;
            if span < 0.0 {
                continue;
            }
            let half = span.sqrt();
            let x_start = ((c.0 - half - 0.5).ceil() as i64).max(0);
            let x_end = ((c.0 + half - 0.5).floor() as i64).min(self.width() as i64 - 1);
            for x in x_start..=x_end {
                self.blend_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2) -> Result<(), Infallible> {
        let Some(color) = self.stroke else {
            return Ok(());
        };
        let weight = self.weight.max(0.0);
        let a = self.to_pixel_space(from);
        let b = self.to_pixel_space(to);
        let Some((a, b)) = self.clip_segment(a, b, weight) else {
            return Ok(());
        };

        // DDA walk; consecutive stamps overlap, so each pixel is blended only
        // the first time it is covered
        let d = b - a;
        let steps = d.0.abs().max(d.1.abs()).ceil() as u32;
        let step = if steps == 0 { Vec2::ZERO } else { d / steps as f32 };
        let mut covered = HashSet::new();
        let mut p = a;
        for _ in 0..=steps {
            let (xs, ys) = Self::stamp_footprint(p, weight);
            for y in ys {
                for x in xs.clone() {
                    if covered.insert((x, y)) {
                        self.blend_pixel(x, y, color);
                    }
                }
            }
            p = p + step;
        }
        Ok(())
    }
}
