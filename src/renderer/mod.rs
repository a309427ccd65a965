//! WebGPU rendering module
//!
//! Every sprite is drawn as flat-colored geometry keyed by its image name.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
