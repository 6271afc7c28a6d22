use std::convert::Infallible;

use super::{BlendMode, Color, Surface, Vec2};

/// A line together with the drawing state it was issued under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRecord {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: Option<Color>,
    pub weight: f32,
    pub fill: Option<Color>,
    pub blend: BlendMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BlendMode(BlendMode),
    Fill(Option<Color>),
    Stroke(Color),
    StrokeWeight(f32),
    Circle {
        center: Vec2,
        diameter: f32,
        fill: Option<Color>,
        blend: BlendMode,
    },
    Line(LineRecord),
}

/// Surface that draws nothing and remembers every call made on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    blend: BlendMode,
    fill: Option<Color>,
    stroke: Option<Color>,
    weight: f32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            weight: 1.0,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> Vec<(Vec2, f32, Option<Color>, BlendMode)> {
        self.commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::Circle { center, diameter, fill, blend } => Some((center, diameter, fill, blend)),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<LineRecord> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line(line) => Some(*line),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.commands.push(DrawCommand::BlendMode(mode));
    }

    fn fill(&mut self, color: Color) {
        self.fill = Some(color);
        self.commands.push(DrawCommand::Fill(Some(color)));
    }

    fn no_fill(&mut self) {
        self.fill = None;
        self.commands.push(DrawCommand::Fill(None));
    }

    fn stroke(&mut self, color: Color) {
        self.stroke = Some(color);
        self.commands.push(DrawCommand::Stroke(color));
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.weight = weight;
        self.commands.push(DrawCommand::StrokeWeight(weight));
    }

    fn circle(&mut self, center: Vec2, diameter: f32) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Circle {
            center,
            diameter,
            fill: self.fill,
            blend: self.blend,
        });
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Line(LineRecord {
            from,
            to,
            stroke: self.stroke,
            weight: self.weight,
            fill: self.fill,
            blend: self.blend,
        }));
        Ok(())
    }
}
