use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CosmosError {
    #[error("sphere radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),

    #[error("chord count must not be negative, got {0}")]
    NegativeChordCount(i64),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("sphere center must be finite")]
    InvalidCenter,

    #[error("light position must be finite")]
    InvalidLight,

    #[error("canvas sides must be within 1..=8192, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("scene has no spheres")]
    EmptyScene,

    #[error("scene file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("scene file parse error: {0}")]
    ConfigParse(String),

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
