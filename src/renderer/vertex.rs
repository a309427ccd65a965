//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements, keyed by the image a sprite shows
pub mod colors {
    pub const GRASS: [f32; 4] = [0.22, 0.45, 0.18, 1.0];
    pub const CASTLE: [f32; 4] = [0.35, 0.33, 0.38, 1.0];
    pub const WALL: [f32; 4] = [0.45, 0.42, 0.40, 1.0];
    pub const BLOCK: [f32; 4] = [0.70, 0.55, 0.35, 1.0];
    pub const BLOCK_EXTRA_LIFE: [f32; 4] = [0.90, 0.30, 0.40, 1.0];
    pub const BLOCK_EXTRA_BALL: [f32; 4] = [0.30, 0.55, 0.95, 1.0];
    pub const PRINCESS: [f32; 4] = [0.85, 0.45, 0.80, 1.0];
    pub const PRINCESS_HEAD: [f32; 4] = [0.98, 0.85, 0.70, 1.0];
    pub const BALL: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    pub const BALL_PATCH: [f32; 4] = [0.08, 0.08, 0.08, 1.0];
    pub const UNKNOWN: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Base color for an image name
    pub fn for_image(image: &str) -> [f32; 4] {
        match image {
            "grass.png" => GRASS,
            "castle.png" => CASTLE,
            "wall.png" => WALL,
            "block1.png" => BLOCK,
            "block2.png" => BLOCK_EXTRA_LIFE,
            "block3.png" => BLOCK_EXTRA_BALL,
            "ann.png" => PRINCESS,
            "ball.png" => BALL,
            _ => UNKNOWN,
        }
    }
}
