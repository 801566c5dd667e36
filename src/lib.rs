pub mod camera;
pub mod capability;
pub mod cli;
pub mod core;
pub mod loaders;
pub mod math;
pub mod overlay;
pub mod picking;
pub mod playlist;
pub mod renderer;
pub mod scene;
pub mod showcase;
pub mod ui;

pub use showcase::{PlaylistLayout, Showcase, ShowcaseOptions};
