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
    /// Same color with a different alpha
    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const BACKGROUND: [f32; 4] = [0.12, 0.02, 0.04, 1.0];
    pub const BACKGROUND_HIGH_CONTRAST: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    // Syringe
    pub const BARREL: [f32; 4] = [0.85, 0.9, 0.95, 0.55];
    pub const MEDICINE: [f32; 4] = [0.53, 0.81, 0.92, 0.9];
    pub const PLUNGER: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
    pub const NEEDLE: [f32; 4] = [0.69, 0.69, 0.69, 1.0];
    pub const SPRAY: [f32; 4] = [0.53, 0.81, 0.92, 0.35];

    // Droplets
    pub const DROPLET: [f32; 4] = [0.3, 0.7, 1.0, 1.0];
    pub const DROPLET_GLOW: [f32; 4] = [0.3, 0.7, 1.0, 0.25];
    pub const DROPLET_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.7];

    /// Hemorrhoid body colors, indexed by palette
    pub const HEMORRHOID: [[f32; 4]; 3] = [
        [1.0, 0.3, 0.3, 1.0],
        [1.0, 0.5, 0.5, 1.0],
        [1.0, 0.7, 0.7, 1.0],
    ];
    /// Darker core for each body color
    pub const HEMORRHOID_INNER: [[f32; 4]; 3] = [
        [0.8, 0.0, 0.0, 1.0],
        [1.0, 0.3, 0.3, 1.0],
        [1.0, 0.5, 0.5, 1.0],
    ];
    pub const HEMORRHOID_GLOW: [f32; 4] = [1.0, 0.0, 0.0, 0.15];
    pub const HEMORRHOID_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

    /// Explosion colors, indexed by palette
    pub const PARTICLE: [[f32; 4]; 4] = [
        [1.0, 0.3, 0.3, 1.0],
        [1.0, 0.5, 0.5, 1.0],
        [1.0, 0.7, 0.7, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ];

    // Microbes
    pub const BLOOD_CELL: [f32; 4] = [0.9, 0.08, 0.08, 0.85];
    pub const BLOOD_CELL_CENTER: [f32; 4] = [0.7, 0.0, 0.0, 0.4];
    pub const WHITE_CELL: [f32; 4] = [0.93, 0.93, 0.95, 0.85];
    pub const WHITE_CELL_NUCLEUS: [f32; 4] = [0.78, 0.78, 0.94, 0.8];
    pub const PLATELET: [f32; 4] = [1.0, 0.96, 0.73, 0.8];
    pub const BACTERIA: [f32; 4] = [0.5, 0.78, 0.5, 0.75];
    pub const VIRUS: [f32; 4] = [0.39, 0.39, 0.55, 0.7];
}
