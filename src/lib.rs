//! Shading stages for a point-lit mesh path and an unlit textured quad path.
//!
//! The crate describes the programmable part of a render pipeline twice, kept
//! in lockstep: pure CPU functions over [`glam`] types that can be tested
//! directly, and WGSL source constants with matching buffer layouts for the
//! GPU. Resource allocation, pipeline construction and draw submission stay
//! with the hosting application so the shading logic remains testable and
//! easy to embed in headless tools.

pub mod mesh;
pub mod quad;
pub mod raster;
pub mod uniforms;
pub mod wgsl;

pub use mesh::{DrawState, Varyings, Vertex};
pub use quad::{QuadVaryings, QuadVertex, TextureSample};
pub use raster::{Interpolate, Target};
pub use uniforms::{Camera, LightsUniform, Object, PointLight, UniformError, MAX_LIGHTS};
