use crate::constants::{AMBIENT_LIGHT, CLEAR_COLOR, DIFFUSE_LIGHT, INITIAL_VERTEX_CAPACITY, LIGHT_DIR};
use glam::Vec3;
use scrollscape_core::constants::{CAMERA_FAR, CAMERA_NEAR};
use scrollscape_core::{CameraState, SceneGraph};
use web_sys as web;

mod batch;
mod helpers;

use batch::{FrameBatch, Lighting, Vertex};

static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

/// Growable GPU buffer; contents are rewritten every frame.
struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    tri_vertices: DynamicBuffer,
    tri_indices: DynamicBuffer,
    line_vertices: DynamicBuffer,
    batch: FrameBatch,
    lighting: Lighting,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let triangle_pipeline = helpers::make_scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let line_pipeline = helpers::make_scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::LineList,
            false,
        );
        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let tri_vertices = DynamicBuffer {
            buffer: helpers::create_vertex_buffer(&device, "tri_vertices", INITIAL_VERTEX_CAPACITY),
            capacity: INITIAL_VERTEX_CAPACITY,
            len: 0,
        };
        let tri_indices = DynamicBuffer {
            buffer: helpers::create_index_buffer(&device, INITIAL_VERTEX_CAPACITY),
            capacity: INITIAL_VERTEX_CAPACITY,
            len: 0,
        };
        let line_vertices = DynamicBuffer {
            buffer: helpers::create_vertex_buffer(&device, "line_vertices", INITIAL_VERTEX_CAPACITY),
            capacity: INITIAL_VERTEX_CAPACITY,
            len: 0,
        };
        log::info!("[gpu] WebGPU ready ({width}x{height}, {format:?})");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            bind_group,
            triangle_pipeline,
            line_pipeline,
            depth_view,
            tri_vertices,
            tri_indices,
            line_vertices,
            batch: FrameBatch::default(),
            lighting: Lighting {
                direction: Vec3::from_array(LIGHT_DIR).normalize_or_zero(),
                ambient: AMBIENT_LIGHT,
                diffuse: DIFFUSE_LIGHT,
            },
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    fn view_proj(&self, camera: &CameraState) -> [[f32; 4]; 4] {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let proj = camera.projection_matrix(aspect, CAMERA_NEAR, CAMERA_FAR);
        (proj * camera.view_matrix()).to_cols_array_2d()
    }

    /// Draw every visible scene graph in one pass.
    pub fn render<'g>(
        &mut self,
        camera: &CameraState,
        graphs: impl Iterator<Item = &'g SceneGraph>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.batch.clear();
        for g in graphs {
            self.batch.push_graph(g, &self.lighting);
        }
        upload(
            &self.device,
            &self.queue,
            &mut self.tri_vertices,
            &self.batch.triangles,
            "tri_vertices",
        );
        upload_indices(&self.device, &self.queue, &mut self.tri_indices, &self.batch.indices);
        upload(
            &self.device,
            &self.queue,
            &mut self.line_vertices,
            &self.batch.lines,
            "line_vertices",
        );
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: self.view_proj(camera),
            }),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR[0],
                            g: CLEAR_COLOR[1],
                            b: CLEAR_COLOR[2],
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
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
            rpass.set_bind_group(0, &self.bind_group, &[]);
            if self.tri_indices.len > 0 {
                rpass.set_pipeline(&self.triangle_pipeline);
                rpass.set_vertex_buffer(0, self.tri_vertices.buffer.slice(..));
                rpass.set_index_buffer(self.tri_indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.tri_indices.len, 0, 0..1);
            }
            if self.line_vertices.len > 0 {
                rpass.set_pipeline(&self.line_pipeline);
                rpass.set_vertex_buffer(0, self.line_vertices.buffer.slice(..));
                rpass.draw(0..self.line_vertices.len, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    dst: &mut DynamicBuffer,
    data: &[Vertex],
    label: &str,
) {
    if data.len() > dst.capacity {
        let capacity = data.len().next_power_of_two();
        log::debug!("[gpu] growing {label} to {capacity} vertices");
        dst.buffer = helpers::create_vertex_buffer(device, label, capacity);
        dst.capacity = capacity;
    }
    if !data.is_empty() {
        queue.write_buffer(&dst.buffer, 0, bytemuck::cast_slice(data));
    }
    dst.len = data.len() as u32;
}

fn upload_indices(device: &wgpu::Device, queue: &wgpu::Queue, dst: &mut DynamicBuffer, data: &[u32]) {
    if data.len() > dst.capacity {
        let capacity = data.len().next_power_of_two();
        dst.buffer = helpers::create_index_buffer(device, capacity);
        dst.capacity = capacity;
    }
    if !data.is_empty() {
        queue.write_buffer(&dst.buffer, 0, bytemuck::cast_slice(data));
    }
    dst.len = data.len() as u32;
}
