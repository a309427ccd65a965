//! WebGPU render pipeline setup

use super::vertex::{Vertex, colors};

/// Room for a full castle level without reallocating
const INITIAL_VERTEX_CAPACITY: usize = 2048;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Vertices the buffer can hold before it must be reallocated
    vertex_capacity: usize,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Game display size for coordinate mapping
    pub display: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        display: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("castle-break-in-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_capacity = INITIAL_VERTEX_CAPACITY;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            vertex_capacity,
            size: (width, height),
            display,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Convert game coordinates to normalized device coordinates
    pub fn game_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let (w, h) = self.size;
        screen_to_ndc(x, y, self.display, w as f32 / h as f32)
    }

    /// Upload vertices and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        // Convert vertices to NDC
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let (x, y) = self.game_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();

        if ndc_vertices.len() > self.vertex_capacity {
            self.vertex_capacity = ndc_vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc_vertices));
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Map screen pixels (y down) to NDC, letterboxed to keep the display's aspect
pub fn screen_to_ndc(x: f32, y: f32, display: (f32, f32), viewport_aspect: f32) -> (f32, f32) {
    let (dw, dh) = display;
    let display_aspect = dw / dh;
    let (sx, sy) = if viewport_aspect > display_aspect {
        // Viewport wider than the display: bars left and right
        (display_aspect / viewport_aspect, 1.0)
    } else {
        (1.0, viewport_aspect / display_aspect)
    };

    ((x / dw * 2.0 - 1.0) * sx, (1.0 - y / dh * 2.0) * sy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_corners_map_to_ndc() {
        let display = (800.0, 600.0);
        let aspect = 800.0 / 600.0;
        assert_eq!(screen_to_ndc(0.0, 0.0, display, aspect), (-1.0, 1.0));
        assert_eq!(screen_to_ndc(800.0, 600.0, display, aspect), (1.0, -1.0));
        assert_eq!(screen_to_ndc(400.0, 300.0, display, aspect), (0.0, 0.0));
    }

    #[test]
    fn test_letterbox_on_wide_viewport() {
        // A 16:9 viewport showing a 4:3 display leaves side bars
        let (x, y) = screen_to_ndc(800.0, 0.0, (800.0, 600.0), 16.0 / 9.0);
        assert!(x < 1.0);
        assert!((y - 1.0).abs() < 1e-6);
    }
}
