//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const GRASS: [f32; 4] = [0.12, 0.45, 0.15, 1.0];
    pub const ROAD: [f32; 4] = [0.25, 0.25, 0.28, 1.0];
    pub const STRIPE: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    pub const CAR: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const CAR_INVINCIBLE: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const SPEED_BOOST: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
    pub const INVINCIBILITY: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const REFUEL: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    /// Indexed by `Obstacle::paint`
    pub const OBSTACLES: [[f32; 4]; 4] = [
        [0.55, 0.35, 0.2, 1.0],
        [0.6, 0.2, 0.7, 1.0],
        [0.1, 0.7, 0.7, 1.0],
        [0.95, 0.5, 0.1, 1.0],
    ];
    pub const FUEL_GAUGE: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    pub const FUEL_GAUGE_LOW: [f32; 4] = [0.95, 0.2, 0.2, 1.0];
    pub const FUEL_GAUGE_BACK: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
}
