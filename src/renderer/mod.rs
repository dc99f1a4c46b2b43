//! WebGPU rendering module
//!
//! The scene builder turns game state into colored triangles; the pipeline
//! uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc};
pub use scene::{background_color, build_scene};
pub use vertex::Vertex;
