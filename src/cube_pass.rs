//! GPU pass that draws the cube instances and the axis display.
//!
//! [`CubePass`] owns every GPU resource the viewer needs: the shader, one
//! pipeline per primitive kind, the camera uniform, the per-instance model
//! buffer and the static vertex/index buffers. All of it is created once in
//! [`CubePass::new`] and released when the pass is dropped.
//!
//! # Pipelines
//!
//! | Pipeline   | Topology      | Used for                                  |
//! |------------|---------------|-------------------------------------------|
//! | `faces`    | TriangleList  | filled cube faces                         |
//! | `outline`  | LineList      | dark edge overlay in filled mode          |
//! | `edges`    | LineList      | colored edges in wireframe mode           |
//! | `points`   | PointList     | cube vertices in wireframe mode           |
//! | `axes`     | LineList      | the three axis segments                   |
//!
//! # Instances
//!
//! Model matrices are streamed through an instance-rate vertex buffer. Slot 0
//! always holds the identity matrix (used by the axes); cube instances occupy
//! slots `1..=max_instances`.
//!
//! # Shader validation
//!
//! Shader compilation and pipeline creation run inside a wgpu validation error
//! scope. A rejected shader surfaces as [`InitError::Shader`] and aborts startup.

use glam::Mat4;

use crate::compose::FramePlan;
use crate::config::ViewerConfig;
use crate::error::InitError;
use crate::gpu::GpuContext;
use crate::mesh::{self, CUBE_VERTEX_COUNT, ColorVertex};

const SHADER_SOURCE: &str = include_str!("shaders/cube.wgsl");
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Camera uniforms uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];

const INSTANCE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[[f32; 4]; 4]>() as u64,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &INSTANCE_ATTRIBUTES,
};

/// Compile a WGSL source, turning validation failures into [`InitError::Shader`].
pub fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, InitError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(InitError::Shader {
            stage: "shader compilation",
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

struct Pipelines {
    faces: wgpu::RenderPipeline,
    outline: wgpu::RenderPipeline,
    edges: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    axes: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
    ) -> Result<Self, InitError> {
        let build = |label: &str,
                     topology: wgpu::PrimitiveTopology,
                     fragment: &str,
                     depth_compare: wgpu::CompareFunction| {
            let cull_mode = match topology {
                wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
                _ => None,
            };
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs"),
                    buffers: &[ColorVertex::LAYOUT, INSTANCE_LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some(fragment),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        use wgpu::CompareFunction::{Less, LessEqual};
        use wgpu::PrimitiveTopology::{LineList, PointList, TriangleList};

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines = Self {
            faces: build("Cube Faces Pipeline", TriangleList, "fs", Less),
            // Edges coincide with face depths, so they must pass on equal.
            outline: build("Cube Outline Pipeline", LineList, "fs_outline", LessEqual),
            edges: build("Cube Edges Pipeline", LineList, "fs", LessEqual),
            points: build("Cube Points Pipeline", PointList, "fs", LessEqual),
            axes: build("Axes Pipeline", LineList, "fs", Less),
        };
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => Err(InitError::Shader {
                stage: "pipeline link",
                message: err.to_string(),
            }),
            None => Ok(pipelines),
        }
    }
}

/// Draws cube instances and axes into the window surface.
pub struct CubePass {
    pipelines: Pipelines,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    cube_vertices: wgpu::Buffer,
    cube_edges: wgpu::Buffer,
    edge_index_count: u32,
    axis_vertices: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    clear_color: wgpu::Color,
}

impl CubePass {
    /// Create all GPU resources for the surface in `gpu`.
    pub fn new(gpu: &GpuContext, config: &ViewerConfig) -> Result<Self, InitError> {
        Self::with_device(
            &gpu.device,
            gpu.config.format,
            (gpu.width(), gpu.height()),
            config,
        )
    }

    /// Create all GPU resources for a color target of the given format and size.
    pub fn with_device(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: (u32, u32),
        config: &ViewerConfig,
    ) -> Result<Self, InitError> {
        let shader = compile_shader(device, "Cube Shader", SHADER_SOURCE)?;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = Pipelines::new(device, &shader, &pipeline_layout, format)?;

        // One extra slot for the identity matrix used by the axes.
        let instance_capacity = config.max_instances + 1;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Models"),
            size: (instance_capacity * std::mem::size_of::<[[f32; 4]; 4]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let edge_indices = mesh::cube_edge_indices();
        let cube_edges = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Cube Edge Indices"),
                contents: bytemuck::cast_slice(&edge_indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let cube_vertices = mesh::vertex_buffer(device, "Cube Vertices", &mesh::cube_vertices());
        let axis_vertices = mesh::vertex_buffer(
            device,
            "Axis Vertices",
            &mesh::axis_vertices(config.axis_length),
        );

        let depth_view = create_depth_view(device, size);
        let [r, g, b] = config.clear_color;

        Ok(Self {
            pipelines,
            camera_buffer,
            camera_bind_group,
            instance_buffer,
            instance_capacity,
            cube_vertices,
            cube_edges,
            edge_index_count: edge_indices.len() as u32,
            axis_vertices,
            depth_view,
            depth_size: size,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        })
    }

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if self.depth_size != size {
            self.depth_view = create_depth_view(device, size);
            self.depth_size = size;
        }
    }

    /// Render one frame and present it.
    pub fn render(&mut self, gpu: &GpuContext, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        self.ensure_depth_size(&gpu.device, (gpu.width(), gpu.height()));

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Encoder"),
            });
        self.encode(&gpu.queue, &mut encoder, &view, plan);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Record the draws for `plan` into `encoder`, targeting `view`.
    pub fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        let camera_uniforms = CameraUniforms {
            view_proj: plan.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        let models: Vec<[[f32; 4]; 4]> = std::iter::once(Mat4::IDENTITY)
            .chain(plan.models.iter().copied())
            .take(self.instance_capacity)
            .map(|m| m.to_cols_array_2d())
            .collect();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&models));
        let cubes = 1..models.len() as u32;

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cube Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        if plan.show_axes {
            render_pass.set_pipeline(&self.pipelines.axes);
            render_pass.set_vertex_buffer(0, self.axis_vertices.slice(..));
            render_pass.draw(0..6, 0..1);
        }

        render_pass.set_vertex_buffer(0, self.cube_vertices.slice(..));
        render_pass.set_index_buffer(self.cube_edges.slice(..), wgpu::IndexFormat::Uint16);

        if plan.wireframe {
            render_pass.set_pipeline(&self.pipelines.edges);
            render_pass.draw_indexed(0..self.edge_index_count, 0, cubes.clone());
            render_pass.set_pipeline(&self.pipelines.points);
            render_pass.draw(0..CUBE_VERTEX_COUNT, cubes);
        } else {
            render_pass.set_pipeline(&self.pipelines.faces);
            render_pass.draw(0..CUBE_VERTEX_COUNT, cubes.clone());
            render_pass.set_pipeline(&self.pipelines.outline);
            render_pass.draw_indexed(0..self.edge_index_count, 0, cubes);
        }
    }
}

fn create_depth_view(device: &wgpu::Device, (width, height): (u32, u32)) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneState;

    /// A device without a surface, or `None` on machines with no usable adapter.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        crate::gpu::request_device(&adapter).ok()
    }

    #[test]
    fn broken_shader_is_an_init_error() {
        let Some((device, _queue)) = headless_device() else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };

        let result = compile_shader(&device, "Broken", "@vertex fn vs( -> {");
        assert!(matches!(result, Err(InitError::Shader { .. })));
    }

    #[test]
    fn renders_offscreen() {
        let Some((device, queue)) = headless_device() else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let config = ViewerConfig::default();
        let pass = CubePass::with_device(&device, format, (64, 64), &config)
            .expect("bundled shader must validate");

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut scene = SceneState::new(&config);
        for wireframe in [false, true] {
            scene.wireframe = wireframe;
            scene.spawn_instance();
            let plan = FramePlan::compose(&scene, &config);

            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let mut encoder =
                device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
            pass.encode(&queue, &mut encoder, &view, &plan);
            queue.submit(std::iter::once(encoder.finish()));
            let err = pollster::block_on(device.pop_error_scope());
            assert!(err.is_none(), "validation error: {err:?}");
        }
    }
}
