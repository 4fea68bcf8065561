//! Vertex format and the fixed geometry the viewer draws.
//!
//! - [`ColorVertex`] — position + RGB color, 24 bytes per vertex
//! - [`cube_vertices`] — 36 vertices (12 triangles), one flat color per face
//! - [`cube_edge_indices`] — line-list indices over the cube triangles, for wireframe
//! - [`axis_vertices`] — three line segments along +X, +Y and +Z
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | color     | Float32x3 | 12     | 1               |

use wgpu::util::DeviceExt;

/// A vertex with position and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ColorVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

pub const CUBE_VERTEX_COUNT: u32 = 36;

const FRONT: [f32; 3] = [0.9, 0.2, 0.2];
const BACK: [f32; 3] = [0.2, 0.8, 0.2];
const TOP: [f32; 3] = [0.3, 0.3, 0.9];
const BOTTOM: [f32; 3] = [0.9, 0.9, 0.2];
const RIGHT: [f32; 3] = [0.9, 0.2, 0.9];
const LEFT: [f32; 3] = [0.2, 0.9, 0.9];

/// Unit cube centered at the origin, as a triangle list with counter-clockwise faces.
pub fn cube_vertices() -> Vec<ColorVertex> {
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        (
            [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
            FRONT,
        ),
        (
            [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
            BACK,
        ),
        (
            [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
            TOP,
        ),
        (
            [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
            BOTTOM,
        ),
        (
            [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
            RIGHT,
        ),
        (
            [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
            LEFT,
        ),
    ];

    faces
        .iter()
        .flat_map(|(c, color)| {
            [c[0], c[1], c[2], c[0], c[2], c[3]].map(|p| ColorVertex::new(p, *color))
        })
        .collect()
}

/// Line-list indices tracing every triangle edge of [`cube_vertices`].
pub fn cube_edge_indices() -> Vec<u16> {
    (0..CUBE_VERTEX_COUNT as u16)
        .step_by(3)
        .flat_map(|t| [t, t + 1, t + 1, t + 2, t + 2, t])
        .collect()
}

/// Three segments from the origin, red along X, green along Y, blue along Z.
pub fn axis_vertices(length: f32) -> [ColorVertex; 6] {
    const RED: [f32; 3] = [1.0, 0.0, 0.0];
    const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
    const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
    [
        ColorVertex::new([0.0, 0.0, 0.0], RED),
        ColorVertex::new([length, 0.0, 0.0], RED),
        ColorVertex::new([0.0, 0.0, 0.0], GREEN),
        ColorVertex::new([0.0, length, 0.0], GREEN),
        ColorVertex::new([0.0, 0.0, 0.0], BLUE),
        ColorVertex::new([0.0, 0.0, length], BLUE),
    ]
}

/// Upload a vertex slice into a new GPU buffer.
pub fn vertex_buffer(device: &wgpu::Device, label: &str, vertices: &[ColorVertex]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
