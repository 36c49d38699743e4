pub mod renderer;
pub mod scene;

pub use renderer::{Hud, Renderer};
pub use scene::{build_scene, Shape};
