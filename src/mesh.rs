//! The lit mesh path: object-space vertices through a point-light
//! illumination model.
//!
//! Both stages are pure functions of their inputs; the rasterizer (hardware
//! or [`crate::raster`]) sits between them and interpolates [`Varyings`]
//! across each primitive.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3, Vec4};

use crate::uniforms::{Camera, Object, PointLight};

/// Per-vertex input of the mesh path, as laid out in the vertex buffer.
///
/// The normal is not required to be unit length; `uv` is carried for the
/// attribute contract but unused by the current fragment logic.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
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

/// Inter-stage payload of the mesh path.
///
/// The world normal is deliberately left unnormalized here; interpolation
/// shortens it anyway, so normalization is deferred to the fragment stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Varyings {
    pub clip_position: Vec4,
    pub world_position: Vec4,
    pub world_normal: Vec3,
}

impl Varyings {
    /// Barycentric interpolation as the rasterizer performs it.
    pub fn interpolate(a: &Self, b: &Self, c: &Self, lambda: [f32; 3]) -> Self {
        Self {
            clip_position: a.clip_position * lambda[0]
                + b.clip_position * lambda[1]
                + c.clip_position * lambda[2],
            world_position: a.world_position * lambda[0]
                + b.world_position * lambda[1]
                + c.world_position * lambda[2],
            world_normal: a.world_normal * lambda[0]
                + b.world_normal * lambda[1]
                + c.world_normal * lambda[2],
        }
    }
}

/// Immutable snapshot of the uniforms for one draw call.
///
/// The resource manager owns double buffering; the stages only ever read a
/// stable copy for the duration of their evaluation.
#[derive(Clone, Copy, Debug)]
pub struct DrawState<'a> {
    pub camera: Camera,
    pub object: Object,
    pub lights: &'a [PointLight],
}

/// Transforms one vertex into world and clip space.
///
/// The upper-left 3x3 of the model matrix is used as the normal transform,
/// so normals drift under non-uniform scale.
pub fn vertex_stage(vertex: &Vertex, state: &DrawState) -> Varyings {
    let world_position = state.object.model * Vec3::from(vertex.position).extend(1.0);
    let world_normal = Mat3::from_mat4(state.object.model) * Vec3::from(vertex.normal);
    Varyings {
        clip_position: state.camera.view_proj * world_position,
        world_position,
        world_normal,
    }
}

/// Shades one fragment: summed per-light diffuse/specular contributions,
/// blended by the object's metallic factor and attenuated by distance.
///
/// Degenerate directions (zero-length normal, light or camera coincident
/// with the surface point) normalize to the zero vector, so the affected
/// terms contribute nothing instead of going non-finite.
pub fn fragment_stage(varyings: &Varyings, state: &DrawState) -> Vec4 {
    let normal = varyings.world_normal.normalize_or_zero();
    let world_pos = varyings.world_position.truncate();
    let view_dir = (state.camera.position - world_pos).normalize_or_zero();

    let mut total = Vec3::ZERO;
    for light in state.lights {
        let light_dir = (light.position - world_pos).normalize_or_zero();
        let diffuse = light_dir.dot(normal).clamp(0.0, 1.0);
        let incoming = -light_dir;
        let reflected = incoming - 2.0 * incoming.dot(normal) * normal;
        let specular = reflected.dot(view_dir).clamp(0.0, 1.0);
        let blend = diffuse + (specular - diffuse) * state.object.metallic;
        let falloff = attenuation(light.position.distance_squared(world_pos));
        total += light.color * (blend * light.strength * falloff);
    }
    total.extend(1.0)
}

/// Distance falloff. The +1 keeps the factor in (0, 1] with no singularity
/// as a light approaches the surface.
fn attenuation(distance_squared: f32) -> f32 {
    1.0 / (distance_squared + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn camera_at(position: Vec3) -> Camera {
        Camera {
            position,
            view_proj: Mat4::IDENTITY,
        }
    }

    fn state<'a>(camera: Vec3, metallic: f32, lights: &'a [PointLight]) -> DrawState<'a> {
        DrawState {
            camera: camera_at(camera),
            object: Object {
                model: Mat4::IDENTITY,
                metallic,
            },
            lights,
        }
    }

    fn surface_varyings(world_pos: Vec3, normal: Vec3) -> Varyings {
        Varyings {
            clip_position: world_pos.extend(1.0),
            world_position: world_pos.extend(1.0),
            world_normal: normal,
        }
    }

    const WHITE_LIGHT_ABOVE: PointLight = PointLight {
        position: Vec3::new(0.0, 5.0, 0.0),
        color: Vec3::ONE,
        strength: 10.0,
    };

    #[test]
    fn vertex_stage_transforms_position_and_normal() {
        let vertex = Vertex {
            position: [1.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.5, 0.5],
        };
        let state = DrawState {
            camera: Camera {
                position: Vec3::ZERO,
                view_proj: Mat4::from_scale(Vec3::splat(2.0)),
            },
            object: Object {
                model: Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)),
                metallic: 0.0,
            },
            lights: &[],
        };

        let varyings = vertex_stage(&vertex, &state);
        assert_eq!(varyings.world_position, Vec4::new(1.0, 3.0, 0.0, 1.0));
        // Translation must not touch the normal.
        assert_eq!(varyings.world_normal, Vec3::Y);
        assert_eq!(varyings.clip_position, Vec4::new(2.0, 6.0, 0.0, 1.0));
    }

    #[test]
    fn vertex_stage_does_not_renormalize() {
        let vertex = Vertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
        };
        let state = DrawState {
            camera: camera_at(Vec3::ZERO),
            object: Object {
                model: Mat4::from_scale(Vec3::splat(2.0)),
                metallic: 0.0,
            },
            lights: &[],
        };
        let varyings = vertex_stage(&vertex, &state);
        assert!((varyings.world_normal.length() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn back_facing_light_contributes_nothing() {
        let below = PointLight {
            position: Vec3::new(0.0, -5.0, 0.0),
            ..WHITE_LIGHT_ABOVE
        };
        let lights = [below];
        let state = state(Vec3::new(0.0, 5.0, 0.0), 0.0, &lights);
        let varyings = surface_varyings(Vec3::ZERO, Vec3::Y);
        let color = fragment_stage(&varyings, &state);
        assert_eq!(color, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn mirror_aligned_view_sees_full_specular() {
        // Light comes in along (-0.6, -0.8, 0); its reflection about +Y is
        // (-0.6, 0.8, 0), and the camera sits on exactly that ray.
        let light = PointLight {
            position: Vec3::new(3.0, 4.0, 0.0),
            color: Vec3::ONE,
            strength: 26.0,
        };
        let lights = [light];
        let state = state(Vec3::new(-3.0, 4.0, 0.0), 1.0, &lights);
        let varyings = surface_varyings(Vec3::ZERO, Vec3::Y);
        let color = fragment_stage(&varyings, &state);
        // dist^2 = 25, so strength 26 cancels the attenuation.
        assert!((color.x - 1.0).abs() < 1e-5, "specular term was {}", color.x);
    }

    #[test]
    fn reflection_holds_off_the_axes() {
        // Surface tilted to n = (1, 1, 0) / sqrt(2); light straight above
        // sends (0, -1, 0) in, which reflects to (1, 0, 0). A camera on +X
        // sees full specular.
        let light = PointLight {
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Vec3::ONE,
            strength: 26.0,
        };
        let lights = [light];
        let state = state(Vec3::new(5.0, 0.0, 0.0), 1.0, &lights);
        let varyings = surface_varyings(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        let color = fragment_stage(&varyings, &state);
        assert!((color.x - 1.0).abs() < 1e-5, "specular term was {}", color.x);
    }

    #[test]
    fn metallic_blend_is_exact_linear_interpolation() {
        // diffuse = 1, specular = 0.8 with this geometry.
        let light = PointLight {
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Vec3::ONE,
            strength: 26.0,
        };
        let lights = [light];
        let varyings = surface_varyings(Vec3::ZERO, Vec3::Y);

        let diffuse_only = fragment_stage(&varyings, &state(Vec3::new(3.0, 4.0, 0.0), 0.0, &lights));
        let specular_only =
            fragment_stage(&varyings, &state(Vec3::new(3.0, 4.0, 0.0), 1.0, &lights));
        let halfway = fragment_stage(&varyings, &state(Vec3::new(3.0, 4.0, 0.0), 0.5, &lights));

        assert!((diffuse_only.x - 1.0).abs() < 1e-5);
        assert!((specular_only.x - 0.8).abs() < 1e-5);
        assert!((halfway.x - 0.9).abs() < 1e-5);
    }

    #[test]
    fn attenuation_is_bounded_and_decreasing() {
        assert_eq!(attenuation(0.0), 1.0);
        let mut previous = attenuation(0.0);
        for distance in [1.0f32, 2.0, 5.0, 10.0, 100.0] {
            let current = attenuation(distance * distance);
            assert!(current < previous);
            assert!(current > 0.0);
            previous = current;
        }
    }

    #[test]
    fn contributions_sum_over_all_lights() {
        let lights = [WHITE_LIGHT_ABOVE, WHITE_LIGHT_ABOVE];
        let one = [WHITE_LIGHT_ABOVE];
        let varyings = surface_varyings(Vec3::ZERO, Vec3::Y);
        let single = fragment_stage(&varyings, &state(Vec3::new(0.0, 5.0, 0.0), 0.0, &one));
        let double = fragment_stage(&varyings, &state(Vec3::new(0.0, 5.0, 0.0), 0.0, &lights));
        assert!((double.x - 2.0 * single.x).abs() < 1e-6);
        assert_eq!(double.w, 1.0);
    }

    #[test]
    fn light_at_surface_point_stays_finite() {
        let coincident = PointLight {
            position: Vec3::ZERO,
            ..WHITE_LIGHT_ABOVE
        };
        let lights = [coincident];
        let state = state(Vec3::new(0.0, 5.0, 0.0), 0.5, &lights);
        let varyings = surface_varyings(Vec3::ZERO, Vec3::Y);
        let color = fragment_stage(&varyings, &state);
        assert!(color.is_finite());
        assert_eq!(color.truncate(), Vec3::ZERO);
    }

    #[test]
    fn zero_length_normal_stays_finite() {
        let lights = [WHITE_LIGHT_ABOVE];
        let state = state(Vec3::new(0.0, 5.0, 0.0), 0.0, &lights);
        let varyings = surface_varyings(Vec3::ZERO, Vec3::ZERO);
        let color = fragment_stage(&varyings, &state);
        assert!(color.is_finite());
        assert_eq!(color, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn interpolation_is_barycentric() {
        let a = surface_varyings(Vec3::ZERO, Vec3::X);
        let b = surface_varyings(Vec3::new(2.0, 0.0, 0.0), Vec3::Y);
        let c = surface_varyings(Vec3::new(0.0, 2.0, 0.0), Vec3::Z);
        let mid = Varyings::interpolate(&a, &b, &c, [0.5, 0.25, 0.25]);
        assert_eq!(mid.world_position, Vec4::new(0.5, 0.5, 0.0, 1.0));
        assert_eq!(mid.world_normal, Vec3::new(0.5, 0.25, 0.25));
    }
}
