pub mod canvas;
pub mod config;
pub mod error;
pub mod recorder;
pub mod renderer;
pub mod scene;
pub mod shapes;
pub mod surface;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use recorder::*;
pub use renderer::*;
pub use scene::*;
pub use shapes::*;
pub use surface::*;
