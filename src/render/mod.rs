pub mod renderer;

pub use renderer::{HudLine, Renderer};
