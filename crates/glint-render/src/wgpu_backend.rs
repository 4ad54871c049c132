//! The wgpu implementation of the draw-backend contract.

use std::sync::Arc;

use ahash::HashMap;
use glint_core::math::fast::Mat4;

use crate::backend::QuadBackend;
use crate::color::Color;
use crate::context::GraphicsContext;
use crate::pipeline;
use crate::slots::TextureHandle;
use crate::vertex::Vertex;

/// Configuration for a [`WgpuBackend`].
#[derive(Debug, Clone)]
pub struct WgpuBackendDescriptor {
    /// Color format of the render target this backend draws into.
    pub target_format: wgpu::TextureFormat,
    /// Quad capacity of the GPU vertex and index buffers; must match the
    /// batcher's `max_quads`.
    pub max_quads: usize,
}

impl Default for WgpuBackendDescriptor {
    fn default() -> Self {
        Self {
            target_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            max_quads: 1000,
        }
    }
}

struct TextureEntry {
    view: Arc<wgpu::TextureView>,
    // keeps the texture alive for registrations made through this backend
    _texture: Option<wgpu::Texture>,
}

/// Draw backend over a wgpu device.
///
/// The written vertex prefix is uploaded into a fixed-size vertex buffer,
/// the precomputed quad index pattern lives in static index data, and the
/// slot table is realized as a texture binding array padded out with the
/// white texture. Every draw is recorded into its own encoder and submitted
/// immediately, matching the synchronous call-then-return model of the
/// session; the frame target is set once per frame with
/// [`begin_frame`](Self::begin_frame).
pub struct WgpuBackend {
    context: Arc<GraphicsContext>,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    /// Slot list the current bind group was built from, for change
    /// detection across flushes.
    bound_slots: Vec<TextureHandle>,
    sampler: wgpu::Sampler,
    white_handle: TextureHandle,
    white_view: Arc<wgpu::TextureView>,
    _white_texture: wgpu::Texture,
    textures: HashMap<u64, TextureEntry>,
    next_handle: u64,
    target: Option<Arc<wgpu::TextureView>>,
    max_slots: usize,
}

impl WgpuBackend {
    pub fn new(context: Arc<GraphicsContext>, descriptor: WgpuBackendDescriptor) -> Self {
        let device = &context.device;
        let queue = &context.queue;

        let max_slots = GraphicsContext::MAX_BOUND_TEXTURES as usize;

        let vertex_buffer = pipeline::create_vertex_buffer(device, descriptor.max_quads);
        let index_buffer = pipeline::create_index_buffer(device, descriptor.max_quads);
        let globals_buffer = pipeline::create_globals_buffer(device);

        let globals_layout = pipeline::create_globals_bind_group_layout(device);
        let globals_bind_group =
            pipeline::create_globals_bind_group(device, &globals_layout, &globals_buffer);

        let texture_layout =
            pipeline::create_texture_array_bind_group_layout(device, max_slots as u32);

        let (white_texture, white_view) = pipeline::create_white_texture(device, queue);
        let white_view = Arc::new(white_view);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_batch_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_batch_shader"),
            source: wgpu::ShaderSource::Wgsl(pipeline::QUAD_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_batch_pipeline_layout"),
            bind_group_layouts: &[&texture_layout, &globals_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = pipeline::create_render_pipeline(
            device,
            &shader,
            &pipeline_layout,
            descriptor.target_format,
        );

        // until the first bind, every slot points at white
        let texture_bind_group = {
            let views: Vec<&wgpu::TextureView> = vec![white_view.as_ref(); max_slots];
            pipeline::create_texture_array_bind_group(device, &texture_layout, &views, &sampler)
        };

        tracing::info!(
            "Created wgpu quad backend: {} quads, {} texture slots",
            descriptor.max_quads,
            max_slots
        );

        Self {
            context,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            texture_bind_group,
            bound_slots: Vec::new(),
            sampler,
            white_handle: TextureHandle::from_raw(1),
            white_view,
            _white_texture: white_texture,
            textures: HashMap::default(),
            next_handle: 2,
            target: None,
            max_slots,
        }
    }

    /// Register an externally created texture view, returning its opaque
    /// handle. The caller keeps the owning texture alive.
    pub fn register_texture(&mut self, view: Arc<wgpu::TextureView>) -> TextureHandle {
        self.insert_entry(TextureEntry {
            view,
            _texture: None,
        })
    }

    /// Create and register an RGBA8 texture from raw pixels.
    ///
    /// This is the "load gives back a handle" contract; image decoding
    /// happens elsewhere and hands raw pixels in.
    pub fn create_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> TextureHandle {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quad_batch_user_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = Arc::new(texture.create_view(&wgpu::TextureViewDescriptor::default()));

        self.insert_entry(TextureEntry {
            view,
            _texture: Some(texture),
        })
    }

    /// Set the render target for this frame, optionally clearing it first.
    ///
    /// Sub-batch draws load the target so they accumulate; the clear is its
    /// own pass up front.
    pub fn begin_frame(&mut self, target: Arc<wgpu::TextureView>, clear: Option<Color>) {
        if let Some(color) = clear {
            let mut encoder =
                self.context
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("quad_batch_clear_encoder"),
                    });
            // beginning and ending the pass records the clear
            let clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_batch_clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            drop(clear_pass);
            self.context.queue.submit(std::iter::once(encoder.finish()));
        }
        self.target = Some(target);
    }

    fn insert_entry(&mut self, entry: TextureEntry) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.textures.insert(handle.raw(), entry);
        handle
    }

    fn view_for(&self, handle: TextureHandle) -> &wgpu::TextureView {
        if handle == self.white_handle {
            return self.white_view.as_ref();
        }
        match self.textures.get(&handle.raw()) {
            Some(entry) => entry.view.as_ref(),
            None => {
                tracing::warn!("Unknown texture handle {}, using white", handle.raw());
                self.white_view.as_ref()
            }
        }
    }
}

impl QuadBackend for WgpuBackend {
    fn white_texture(&self) -> TextureHandle {
        self.white_handle
    }

    fn max_texture_slots(&self) -> usize {
        self.max_slots
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        // only the written prefix travels to the GPU
        self.context
            .queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    fn bind_texture_slots(&mut self, slots: &[TextureHandle]) {
        if slots == self.bound_slots.as_slice() {
            return;
        }

        let bind_group = {
            let mut views: Vec<&wgpu::TextureView> = Vec::with_capacity(self.max_slots);
            for handle in slots {
                views.push(self.view_for(*handle));
            }
            // unused slots keep sampling white
            while views.len() < self.max_slots {
                views.push(self.white_view.as_ref());
            }
            pipeline::create_texture_array_bind_group(
                &self.context.device,
                &self.texture_layout,
                &views,
                &self.sampler,
            )
        };

        self.texture_bind_group = bind_group;
        self.bound_slots = slots.to_vec();
    }

    fn set_view_projection(&mut self, view_projection: Mat4) {
        self.context.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::cast_slice(&[view_projection.to_cols_array_2d()]),
        );
    }

    fn draw_indexed(&mut self, index_count: u32) {
        let Some(target) = self.target.as_ref() else {
            panic!("draw_indexed called before begin_frame");
        };

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("quad_batch_encoder"),
                });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_batch_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.render_pipeline);
            pass.set_bind_group(0, &self.texture_bind_group, &[]);
            pass.set_bind_group(1, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..index_count, 0, 0..1);
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
    }
}
