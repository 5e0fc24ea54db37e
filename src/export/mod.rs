//! Artifact export
//!
//! - **Render model** - node/edge projection with positions, sizes and colours
//! - **JSON** - render model document for interactive graph viewers
//! - **Image** - PNG rendering of the laid-out graph

pub mod image;
pub mod json;
pub mod render_model;

pub use image::{render_png, ImageOptions};
pub use json::{read_render_model, write_render_model};
pub use render_model::build_render_model;
