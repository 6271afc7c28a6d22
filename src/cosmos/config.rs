//! Scene description loaded from TOML, with defaults for every field.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{Color, CosmicSphere, CosmosError, Scene, Vec2};

/// Largest canvas side; the window path uploads the canvas as a single 2D texture.
pub const MAX_CANVAS_SIDE: u32 = 8192;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub center: [f32; 2],
    /// RGBA, each channel 0..=255
    pub color: [f32; 4],
    pub chord_count: i64,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 300.0,
            center: [0.0, 0.0],
            color: [255.0, 140.0, 60.0, 60.0],
            chord_count: 2000,
        }
    }
}

impl SphereConfig {
    pub fn build(&self) -> Result<CosmicSphere, CosmosError> {
        CosmicSphere::with_signed_chords(
            self.radius,
            Vec2::from(self.center),
            Color::from(self.color),
            self.chord_count,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub background: [f32; 4],
    pub light: [f32; 2],
    /// Fixed RNG seed; a fresh entropy seed is used when absent
    pub seed: Option<u64>,
    pub frame_interval_ms: u64,
    pub spheres: Vec<SphereConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            background: [0.0, 0.0, 0.0, 255.0],
            light: [-600.0, -600.0],
            seed: None,
            frame_interval_ms: 17,
            spheres: vec![SphereConfig::default()],
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, CosmosError> {
        if !path.exists() {
            return Err(CosmosError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("loaded scene from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, CosmosError> {
        let config: SceneConfig =
            toml::from_str(content).map_err(|e| CosmosError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CosmosError> {
        let side = 1..=MAX_CANVAS_SIDE;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(CosmosError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.spheres.is_empty() {
            return Err(CosmosError::EmptyScene);
        }
        if !Vec2::from(self.light).is_finite() {
            return Err(CosmosError::InvalidLight);
        }
        if !Color::from(self.background).is_valid() {
            return Err(CosmosError::InvalidColor(format!(
                "background channels must be within 0..=255, got {:?}",
                self.background
            )));
        }
        for sphere in &self.spheres {
            sphere.build()?;
        }
        Ok(())
    }

    pub fn build_scene(&self) -> Result<Scene, CosmosError> {
        self.validate()?;
        let mut scene = Scene::new(Vec2::from(self.light), Color::from(self.background));
        for sphere in &self.spheres {
            scene.add_sphere(sphere.build()?);
        }
        Ok(scene)
    }
}
