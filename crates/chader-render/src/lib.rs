//! Chader Render Library
//!
//! CPU rasterizer implementing [`chader_core::Renderer`], with PNG export.

mod raster;
mod software;

pub use software::{SoftwareRenderer, encode_png, render_scene_to_png};
