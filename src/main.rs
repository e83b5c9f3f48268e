use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use glam::{Mat4, Vec2, Vec3, Vec4};
use log::info;

use prism_shading::{
    mesh, quad, raster, Camera, DrawState, Object, PointLight, QuadVertex, Target, Vertex,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let mut target = Target::new(
        options.size,
        options.size,
        Vec4::new(0.03, 0.03, 0.05, 1.0),
    );

    let eye = Vec3::new(1.8, 1.6, 2.2);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);
    let camera = Camera {
        position: eye,
        view_proj: projection * view,
    };

    let lights = [
        PointLight {
            position: Vec3::new(2.0, 4.0, 2.0),
            color: Vec3::ONE,
            strength: 8.0,
        },
        PointLight {
            position: Vec3::new(-3.0, 1.0, -2.0),
            color: Vec3::new(0.4, 0.5, 1.0),
            strength: 3.0,
        },
    ];
    let state = DrawState {
        camera,
        object: Object {
            model: Mat4::from_rotation_y(0.6),
            metallic: options.metallic,
        },
        lights: &lights,
    };

    let vertices = cube_vertices();
    let indices = cube_indices();
    info!(
        "shading {} triangles under {} lights",
        indices.len() / 3,
        lights.len()
    );
    for triangle in indices.chunks_exact(3) {
        let varyings = [
            mesh::vertex_stage(&vertices[triangle[0]], &state),
            mesh::vertex_stage(&vertices[triangle[1]], &state),
            mesh::vertex_stage(&vertices[triangle[2]], &state),
        ];
        raster::draw_triangle(&mut target, &varyings, |fragment| {
            mesh::fragment_stage(fragment, &state)
        });
    }

    draw_overlay(&mut target);

    write_ppm(&options.path, &target)
        .with_context(|| format!("failed to write {}", options.path.display()))?;
    println!(
        "Rendered {size}x{size} preview ({} triangles, {} lights) to {}",
        indices.len() / 3,
        lights.len(),
        options.path.display(),
        size = options.size,
    );
    Ok(())
}

/// Checker-textured quad in the bottom-right corner, tinted by a vertex
/// color gradient. Exercises the unlit path next to the lit one.
fn draw_overlay(target: &mut Target) {
    let corners = [
        QuadVertex {
            position: [0.45, -0.95, 0.0],
            color: [1.0, 1.0, 1.0],
            uv: [0.0, 1.0],
        },
        QuadVertex {
            position: [0.95, -0.95, 0.0],
            color: [1.0, 0.6, 0.6],
            uv: [1.0, 1.0],
        },
        QuadVertex {
            position: [0.95, -0.45, 0.0],
            color: [0.6, 0.6, 1.0],
            uv: [1.0, 0.0],
        },
        QuadVertex {
            position: [0.45, -0.45, 0.0],
            color: [0.6, 1.0, 0.6],
            uv: [0.0, 0.0],
        },
    ];
    let checker = |uv: Vec2| {
        let cell = (uv.x * 8.0).floor() + (uv.y * 8.0).floor();
        if cell as i32 % 2 == 0 {
            Vec4::ONE
        } else {
            Vec4::new(0.25, 0.25, 0.25, 1.0)
        }
    };

    for triangle in [[0, 1, 2], [0, 2, 3]] {
        let varyings = [
            quad::vertex_stage(&corners[triangle[0]]),
            quad::vertex_stage(&corners[triangle[1]]),
            quad::vertex_stage(&corners[triangle[2]]),
        ];
        raster::draw_triangle(target, &varyings, |fragment| {
            quad::fragment_stage(fragment, &checker)
        });
    }
}

fn cube_vertices() -> Vec<Vertex> {
    // One (normal, tangent, bitangent) frame per face.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut vertices = Vec::with_capacity(24);
    for (normal, tangent, bitangent) in FACES {
        let center = normal * 0.5;
        for (u, v) in [(0.0f32, 0.0f32), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let position = center + tangent * (u - 0.5) + bitangent * (v - 0.5);
            vertices.push(Vertex {
                position: position.into(),
                normal: normal.into(),
                uv: [u, v],
            });
        }
    }
    vertices
}

fn cube_indices() -> Vec<usize> {
    let mut indices = Vec::with_capacity(36);
    for face in 0..6 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

fn write_ppm(path: &Path, target: &Target) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write!(writer, "P6\n{} {}\n255\n", target.width, target.height)?;
    writer.write_all(&target.to_rgb8())?;
    Ok(())
}

struct CliOptions {
    path: PathBuf,
    size: usize,
    metallic: f32,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!(
                "Usage: prism-preview <output.ppm> [--size N] [--metallic M]"
            ));
        };
        let mut size = 256usize;
        let mut metallic = 0.3f32;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--size" => {
                    size = args
                        .next()
                        .ok_or_else(|| anyhow!("--size expects a value"))?
                        .parse()
                        .context("--size expects a positive integer")?;
                }
                "--metallic" => {
                    metallic = args
                        .next()
                        .ok_or_else(|| anyhow!("--metallic expects a value"))?
                        .parse()
                        .context("--metallic expects a number in [0, 1]")?;
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --size or --metallic"
                    ));
                }
            }
        }
        if size == 0 {
            return Err(anyhow!("--size must be at least 1"));
        }
        Ok(Self {
            path: PathBuf::from(path),
            size,
            metallic,
        })
    }
}
