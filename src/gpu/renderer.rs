//! Quad renderer with windowed and headless paths.

use super::context::{GpuContext, GpuError};
use super::pipeline::QuadPipeline;
use crate::shader::ShaderProgram;

/// Offscreen color target plus readback geometry.
struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Renders the full-surface quad.
///
/// Windowed use records into an externally acquired swapchain view via
/// [`QuadRenderer::draw`]; headless use owns an offscreen texture and reads
/// frames back as pixels via [`QuadRenderer::render_frame`].
pub struct QuadRenderer {
    ctx: GpuContext,
    pipeline: QuadPipeline,
    target: Option<OffscreenTarget>,
}

impl QuadRenderer {
    /// Renderer drawing into an externally managed surface.
    pub fn for_surface(
        ctx: GpuContext,
        format: wgpu::TextureFormat,
        program: &ShaderProgram,
    ) -> Self {
        let pipeline = QuadPipeline::new(&ctx.device, format, program);
        Self {
            ctx,
            pipeline,
            target: None,
        }
    }

    /// Headless renderer with its own offscreen target.
    ///
    /// Used by tests and environments without a window.
    pub async fn headless(
        width: u32,
        height: u32,
        program: &ShaderProgram,
    ) -> Result<Self, GpuError> {
        let ctx = GpuContext::new().await?;
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let pipeline = QuadPipeline::new(&ctx.device, format, program);

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("render_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            ctx,
            pipeline,
            target: Some(OffscreenTarget {
                texture,
                view,
                width,
                height,
            }),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.ctx.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.ctx.queue
    }

    /// Get GPU adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }

    /// Whether the active program declares the time uniform.
    pub fn has_time_uniform(&self) -> bool {
        self.pipeline.time.is_some()
    }

    /// Record one frame into the given view.
    ///
    /// Clears to opaque black, uploads elapsed seconds when the program
    /// declares the time uniform, and draws the 6-vertex quad.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, elapsed: f32) {
        self.pipeline.write_time(&self.ctx.queue, elapsed);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quad_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
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

        render_pass.set_pipeline(&self.pipeline.pipeline);
        if let Some(ref time) = self.pipeline.time {
            render_pass.set_bind_group(0, &time.bind_group, &[]);
        }
        if self.pipeline.uses_position() {
            render_pass.set_vertex_buffer(0, self.pipeline.vertex_buffer.slice(..));
        }
        render_pass.draw(0..self.pipeline.vertex_count, 0..1);
    }

    /// Render one frame offscreen at the given elapsed time.
    ///
    /// Returns RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics when called on a renderer that was not built with
    /// [`QuadRenderer::headless`].
    pub fn render_frame(&self, elapsed: f32) -> Vec<u8> {
        let target = self
            .target
            .as_ref()
            .expect("render_frame requires a headless renderer");

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        self.draw(&mut encoder, &target.view, elapsed);

        // Copy texture to buffer for readback
        let bytes_per_pixel = 4u32;
        let unpadded_row_bytes = target.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = unpadded_row_bytes.div_ceil(align) * align;
        let buffer_size = (padded_row_bytes * target.height) as u64;

        let readback_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );

        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        // Read back pixels
        let buffer_slice = readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).unwrap();
        });
        self.ctx
            .device
            .poll(wgpu::PollType::wait_indefinitely())
            .unwrap();
        receiver.recv().unwrap().unwrap();

        let data = buffer_slice.get_mapped_range();

        // Remove row padding if present
        let mut pixels = Vec::with_capacity((target.width * target.height * 4) as usize);
        for row in 0..target.height {
            let start = (row * padded_row_bytes) as usize;
            let end = start + unpadded_row_bytes as usize;
            pixels.extend_from_slice(&data[start..end]);
        }

        pixels
    }
}
