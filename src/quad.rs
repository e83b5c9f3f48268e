//! The unlit textured quad path: passthrough vertices, texture sample tinted
//! by the interpolated vertex color.
//!
//! Positions are expected to arrive already projected (normalized device
//! coordinates for a full-screen or UI quad); no matrices are involved.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Per-vertex input of the quad path.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ],
    };
}

/// Inter-stage payload of the quad path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadVaryings {
    pub clip_position: Vec4,
    pub color: Vec3,
    pub uv: Vec2,
}

impl QuadVaryings {
    /// Barycentric interpolation as the rasterizer performs it.
    pub fn interpolate(a: &Self, b: &Self, c: &Self, lambda: [f32; 3]) -> Self {
        Self {
            clip_position: a.clip_position * lambda[0]
                + b.clip_position * lambda[1]
                + c.clip_position * lambda[2],
            color: a.color * lambda[0] + b.color * lambda[1] + c.color * lambda[2],
            uv: a.uv * lambda[0] + b.uv * lambda[1] + c.uv * lambda[2],
        }
    }
}

/// The externally configured texture and sampler pair, seen by the fragment
/// stage as a single sampling seam.
///
/// Filtering and out-of-range UV addressing are the implementor's business.
pub trait TextureSample {
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> TextureSample for F
where
    F: Fn(Vec2) -> Vec4,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

/// Homogenizes the position and copies color and UV through unchanged.
pub fn vertex_stage(vertex: &QuadVertex) -> QuadVaryings {
    QuadVaryings {
        clip_position: Vec3::from(vertex.position).extend(1.0),
        color: vertex.color.into(),
        uv: vertex.uv.into(),
    }
}

/// Samples the texture at the interpolated UV and tints its RGB by the
/// interpolated vertex color. Alpha is always written as 1.0.
pub fn fragment_stage(varyings: &QuadVaryings, texture: &impl TextureSample) -> Vec4 {
    let sampled = texture.sample(varyings.uv);
    (sampled.truncate() * varyings.color).extend(1.0)
}
