//! WGSL sources for the GPU side of both paths.
//!
//! The struct layouts match the Pod mirrors in [`crate::uniforms`] and the
//! math matches the CPU stages in [`crate::mesh`] and [`crate::quad`],
//! including the normalize-or-zero policy for degenerate directions.

/// Lit mesh path. Bindings: group 0 = lights (0), camera (1), object (2).
pub const MESH_SHADER: &str = r#"
struct PointLight {
    position: vec3<f32>,
    color: vec3<f32>,
    strength: f32,
}

struct Lights {
    lights: array<PointLight, 4>,
    count: u32,
}

struct Camera {
    position: vec3<f32>,
    view_proj: mat4x4<f32>,
}

struct Object {
    model: mat4x4<f32>,
    metallic: f32,
}

@group(0) @binding(0)
var<uniform> lights: Lights;

@group(0) @binding(1)
var<uniform> camera: Camera;

@group(0) @binding(2)
var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec4<f32>,
    @location(1) world_normal: vec3<f32>,
}

fn normalize_or_zero(v: vec3<f32>) -> vec3<f32> {
    let len = length(v);
    if (len > 1e-6) {
        return v / len;
    }
    return vec3<f32>(0.0);
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.world_position = world_position;
    out.world_normal = mat3x3<f32>(
        object.model[0].xyz,
        object.model[1].xyz,
        object.model[2].xyz
    ) * input.normal;
    out.clip_position = camera.view_proj * world_position;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize_or_zero(input.world_normal);
    let world_pos = input.world_position.xyz;
    let view_dir = normalize_or_zero(camera.position - world_pos);

    var total = vec3<f32>(0.0);
    for (var i = 0u; i < lights.count; i = i + 1u) {
        let light = lights.lights[i];
        let light_dir = normalize_or_zero(light.position - world_pos);
        let diffuse = clamp(dot(light_dir, normal), 0.0, 1.0);
        let reflected = reflect(-light_dir, normal);
        let specular = clamp(dot(reflected, view_dir), 0.0, 1.0);
        let blend = mix(diffuse, specular, object.metallic);
        let offset = light.position - world_pos;
        let attenuation = 1.0 / (dot(offset, offset) + 1.0);
        total += light.color * blend * light.strength * attenuation;
    }
    return vec4<f32>(total, 1.0);
}
"#;

/// Unlit textured quad path. Bindings: group 0 = texture (0), sampler (1).
pub const QUAD_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

@group(0) @binding(0)
var quad_texture: texture_2d<f32>;

@group(0) @binding(1)
var quad_sampler: sampler;

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(input.position, 1.0);
    out.color = input.color;
    out.uv = input.uv;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let sampled = textureSample(quad_texture, quad_sampler, input.uv);
    return vec4<f32>(sampled.rgb * input.color, 1.0);
}
"#;
