use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capacity of the light array in the GPU uniform layout.
pub const MAX_LIGHTS: usize = 4;

/// Bind group slots for the mesh path.
pub const MESH_LIGHTS_BINDING: u32 = 0;
pub const MESH_CAMERA_BINDING: u32 = 1;
pub const MESH_OBJECT_BINDING: u32 = 2;

/// Bind group slots for the quad path.
pub const QUAD_TEXTURE_BINDING: u32 = 0;
pub const QUAD_SAMPLER_BINDING: u32 = 1;

/// Camera parameters consumed by the shading stages.
///
/// `view_proj` is the combined world-to-clip matrix; `position` is only used
/// to build the view vector for the specular term. Constant for all draws
/// within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub view_proj: Mat4,
}

/// Per-draw object parameters.
///
/// `metallic` blends the fragment stage between diffuse (0.0) and specular
/// (1.0) response. The upper-left 3x3 of `model` doubles as the normal
/// transform, which is only correct without non-uniform scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub model: Mat4,
    pub metallic: f32,
}

/// A point light in world space with linear RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub strength: f32,
}

#[derive(Error, Debug)]
pub enum UniformError {
    #[error("draw supplies {supplied} point lights but the uniform layout holds {}", MAX_LIGHTS)]
    TooManyLights { supplied: usize },
}

/// GPU layout of [`Camera`]. Field order and padding match the WGSL struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub position: [f32; 3],
    pub _padding: f32,
    pub view_proj: [[f32; 4]; 4],
}

/// GPU layout of [`Object`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub metallic: f32,
    pub _padding: [f32; 3],
}

/// GPU layout of [`PointLight`]. One array element of [`LightsUniform`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub _padding: f32,
    pub color: [f32; 3],
    pub strength: f32,
}

/// GPU layout of the light array with its populated count.
///
/// The fragment stage loops over `count` entries; slots past `count` are
/// never read and may hold anything.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    pub lights: [PointLightUniform; MAX_LIGHTS],
    pub count: u32,
    pub _padding: [u32; 3],
}

impl From<&Camera> for CameraUniform {
    fn from(camera: &Camera) -> Self {
        Self {
            position: camera.position.into(),
            _padding: 0.0,
            view_proj: camera.view_proj.to_cols_array_2d(),
        }
    }
}

impl From<&Object> for ObjectUniform {
    fn from(object: &Object) -> Self {
        Self {
            model: object.model.to_cols_array_2d(),
            metallic: object.metallic,
            _padding: [0.0; 3],
        }
    }
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            _padding: 0.0,
            color: light.color.into(),
            strength: light.strength,
        }
    }
}

impl LightsUniform {
    /// Packs the lights into the fixed-capacity uniform layout.
    ///
    /// Fails if more lights are supplied than the layout holds; callers that
    /// prefer truncation over an error should use [`LightsUniform::from_lights`].
    pub fn try_from_lights(lights: &[PointLight]) -> Result<Self, UniformError> {
        if lights.len() > MAX_LIGHTS {
            return Err(UniformError::TooManyLights {
                supplied: lights.len(),
            });
        }
        let mut packed = [PointLightUniform::zeroed(); MAX_LIGHTS];
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = light.into();
        }
        Ok(Self {
            lights: packed,
            count: lights.len() as u32,
            _padding: [0; 3],
        })
    }

    /// Packs the first [`MAX_LIGHTS`] lights, warning when extras are dropped.
    pub fn from_lights(lights: &[PointLight]) -> Self {
        if lights.len() > MAX_LIGHTS {
            warn!(
                "draw supplies {} point lights but the uniform layout holds {}; extras are ignored",
                lights.len(),
                MAX_LIGHTS
            );
        }
        let kept = &lights[..lights.len().min(MAX_LIGHTS)];
        Self::try_from_lights(kept).expect("slice bounded by MAX_LIGHTS")
    }
}
