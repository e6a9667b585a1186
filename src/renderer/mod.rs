pub mod draw;
pub mod pipeline;
pub mod text;
pub mod texture;
pub mod utils;

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use draw::{DrawList, TextureKey};
use pipeline::{QuadPipeline, QuadVertex, create_quad_pipeline, orthographic_projection};
use texture::{Filter, Texture};
use utils::Viewport;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("window surface supports no texture format")]
    NoSurfaceFormat,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: QuadPipeline,
    /// Logical-resolution projection; never changes after startup.
    projection_bind_group: wgpu::BindGroup,
    textures: HashMap<TextureKey, Texture>,
    /// Letterbox rectangle the scene is drawn into, in physical pixels.
    viewport: Viewport,
    /// Persistent vertex buffer; reallocated only when a frame outgrows it.
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_buffer_capacity: u32,
    /// FNV-1a hash of the last upload, to skip `write_buffer` on static frames.
    vertex_hash: u64,
    /// Flattened vertices of the current frame, kept to reuse the allocation.
    scratch: Vec<QuadVertex>,
}

/// FNV-1a 64-bit hash, used to detect unchanged vertex data.
fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(14695981039346656037u64, |h, &b| {
        h.wrapping_mul(1099511628211) ^ b as u64
    })
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        font_atlas: &RgbaImage,
        logical_width: u32,
        logical_height: u32,
        viewport: Viewport,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        info!(adapter = %adapter.get_info().name, backend = ?adapter.get_info().backend, "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_quad_pipeline(&device, format);

        let proj = orthographic_projection(logical_width as f32, logical_height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let mut renderer = Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            projection_bind_group,
            textures: HashMap::new(),
            viewport,
            vertex_buffer: None,
            vertex_buffer_capacity: 0,
            vertex_hash: 0,
            scratch: Vec::new(),
        };

        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        renderer.insert_texture(TextureKey::White, "white", &white, Filter::Nearest);

        renderer.insert_texture(TextureKey::Font, "font_atlas", font_atlas, Filter::Nearest);

        Ok(renderer)
    }

    fn insert_texture(&mut self, key: TextureKey, label: &str, img: &RgbaImage, filter: Filter) {
        let texture = Texture::from_rgba(
            &self.device,
            &self.queue,
            &self.pipeline.texture_bind_group_layout,
            label,
            img,
            filter,
        );
        self.textures.insert(key, texture);
    }

    /// Upload (or replace) the image drawn by `TextureKey::Image(name)`.
    pub fn upload_image(&mut self, name: &str, img: &RgbaImage) {
        debug!(name, width = img.width(), height = img.height(), "uploading image");
        self.insert_texture(TextureKey::Image(name.to_string()), name, img, Filter::Linear);
    }

    pub fn remove_image(&mut self, name: &str) {
        self.textures.remove(&TextureKey::Image(name.to_string()));
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.textures.contains_key(&TextureKey::Image(name.to_string()))
    }

    /// Pixel size of an uploaded image.
    pub fn image_size(&self, name: &str) -> Option<(u32, u32)> {
        self.textures
            .get(&TextureKey::Image(name.to_string()))
            .map(|t| (t.width, t.height))
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>, viewport: Viewport) {
        self.viewport = viewport;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Render one frame: clear to black (the letterbox bars), then draw every
    /// batch of `draw` in order inside the viewport. Batches naming a texture
    /// that was never uploaded are skipped.
    pub fn render(&mut self, draw: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // ── Vertex upload ─────────────────────────────────────────────────
        self.scratch.clear();
        for batch in draw.batches() {
            self.scratch.extend_from_slice(&batch.vertices);
        }

        if !self.scratch.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(&self.scratch);
            let new_hash = fnv1a_64(bytes);
            let new_count = self.scratch.len() as u32;

            if new_count > self.vertex_buffer_capacity || self.vertex_buffer.is_none() {
                let capacity = new_count.next_power_of_two().max(1024);
                self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("quad_vertex_buffer"),
                    size: capacity as u64 * std::mem::size_of::<QuadVertex>() as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                self.vertex_buffer_capacity = capacity;
                self.vertex_hash = !new_hash;
            }

            if new_hash != self.vertex_hash {
                if let Some(buffer) = &self.vertex_buffer {
                    self.queue.write_buffer(buffer, 0, bytes);
                }
                self.vertex_hash = new_hash;
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let vp = self.viewport.clamped(self.config.width as f32, self.config.height as f32);
            let drawable = !vp.is_empty() && !self.scratch.is_empty();
            if let Some(buffer) = self.vertex_buffer.as_ref().filter(|_| drawable) {
                pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
                pass.set_pipeline(&self.pipeline.render_pipeline);
                pass.set_bind_group(0, &self.projection_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));

                let mut first = 0u32;
                for batch in draw.batches() {
                    let count = batch.vertices.len() as u32;
                    if let Some(texture) = self.textures.get(&batch.texture) {
                        pass.set_bind_group(1, &texture.bind_group, &[]);
                        pass.draw(first..first + count, 0..1);
                    }
                    first += count;
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
