//! WebGPU rendering module
//!
//! The scene is built as a colored triangle list in canvas pixels and
//! mapped to clip space on upload. Text lives in DOM overlays.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
