//! Minimal CPU rasterizer standing in for the hardware substrate.
//!
//! Bounding-box scan with edge functions, a less-than depth test and linear
//! attribute interpolation. Attributes are not perspective corrected, which
//! matches what the tests need and keeps the substrate honest about being a
//! reference, not a renderer. Triangles touching the w <= 0 half space are
//! rejected whole; there is no clipping.

use glam::{Vec2, Vec4};

use crate::{mesh, quad};

/// Inter-stage payload the rasterizer can carry across a primitive.
pub trait Interpolate: Copy {
    /// The mandatory clip-space position.
    fn clip_position(&self) -> Vec4;
    /// Barycentric blend of the three vertices.
    fn interpolate(a: &Self, b: &Self, c: &Self, lambda: [f32; 3]) -> Self;
}

impl Interpolate for mesh::Varyings {
    fn clip_position(&self) -> Vec4 {
        self.clip_position
    }

    fn interpolate(a: &Self, b: &Self, c: &Self, lambda: [f32; 3]) -> Self {
        mesh::Varyings::interpolate(a, b, c, lambda)
    }
}

impl Interpolate for quad::QuadVaryings {
    fn clip_position(&self) -> Vec4 {
        self.clip_position
    }

    fn interpolate(a: &Self, b: &Self, c: &Self, lambda: [f32; 3]) -> Self {
        quad::QuadVaryings::interpolate(a, b, c, lambda)
    }
}

/// Color and depth buffers for one render target.
pub struct Target {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Vec4>,
    pub depth: Vec<f32>,
}

impl Target {
    pub fn new(width: usize, height: usize, clear: Vec4) -> Self {
        Self {
            width,
            height,
            color: vec![clear; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Vec4 {
        self.color[y * self.width + x]
    }

    /// Packs the color buffer into 8-bit RGB rows, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width * self.height * 3);
        for texel in &self.color {
            for channel in [texel.x, texel.y, texel.z] {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        bytes
    }
}

/// Rasterizes one triangle, invoking `shade` once per covered fragment.
pub fn draw_triangle<V: Interpolate>(
    target: &mut Target,
    triangle: &[V; 3],
    mut shade: impl FnMut(&V) -> Vec4,
) {
    let clip = [
        triangle[0].clip_position(),
        triangle[1].clip_position(),
        triangle[2].clip_position(),
    ];
    if clip.iter().any(|c| c.w <= 0.0) {
        return;
    }

    let ndc = [clip[0] / clip[0].w, clip[1] / clip[1].w, clip[2] / clip[2].w];
    let screen = [
        to_screen(ndc[0], target.width, target.height),
        to_screen(ndc[1], target.width, target.height),
        to_screen(ndc[2], target.width, target.height),
    ];

    let area = edge(screen[0], screen[1], screen[2]);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min_x = screen.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let max_x = screen.iter().map(|s| s.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = screen.iter().map(|s| s.y).fold(f32::INFINITY, f32::min);
    let max_y = screen.iter().map(|s| s.y).fold(f32::NEG_INFINITY, f32::max);

    let x0 = (min_x.floor().max(0.0)) as usize;
    let x1 = (max_x.ceil().min(target.width as f32)) as usize;
    let y0 = (min_y.floor().max(0.0)) as usize;
    let y1 = (max_y.ceil().min(target.height as f32)) as usize;

    for y in y0..y1 {
        for x in x0..x1 {
            let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let lambda = [
                edge(screen[1], screen[2], point) / area,
                edge(screen[2], screen[0], point) / area,
                edge(screen[0], screen[1], point) / area,
            ];
            if lambda.iter().any(|l| *l < 0.0) {
                continue;
            }

            let depth = lambda[0] * ndc[0].z + lambda[1] * ndc[1].z + lambda[2] * ndc[2].z;
            let index = y * target.width + x;
            if depth >= target.depth[index] {
                continue;
            }

            let varyings = V::interpolate(&triangle[0], &triangle[1], &triangle[2], lambda);
            target.depth[index] = depth;
            target.color[index] = shade(&varyings);
        }
    }
}

fn to_screen(ndc: Vec4, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc.y) * 0.5 * height as f32,
    )
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
