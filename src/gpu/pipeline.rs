//! Full-surface quad rendering pipeline.

use std::borrow::Cow;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, RenderPipeline, TextureFormat};

use crate::shader::ShaderProgram;

/// Uniform data uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub time: f32,
    pub _padding: [f32; 3],
}

/// A clip-space vertex position.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

/// Two triangles covering the full clip-space square.
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Uniform buffer and bind group for the optional time uniform.
pub struct TimeSlot {
    pub buffer: Buffer,
    pub bind_group: BindGroup,
}

/// Quad rendering pipeline.
///
/// Built from a linked [`ShaderProgram`]; the time uniform and position
/// attribute are wired only when the program declares them.
pub struct QuadPipeline {
    pub pipeline: RenderPipeline,
    pub vertex_buffer: Buffer,
    pub time: Option<TimeSlot>,
    pub vertex_count: u32,
    uses_position: bool,
}

impl QuadPipeline {
    /// Create a new quad pipeline targeting the given texture format.
    pub fn new(device: &Device, format: TextureFormat, program: &ShaderProgram) -> Self {
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_fragment"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.fragment().clone())),
        });
        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_vertex"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.vertex().clone())),
        });

        let time_binding = program.time_uniform();
        if let Some(binding) = time_binding {
            if binding.group != 0 {
                log::warn!(
                    "time uniform declared in bind group {}, expected 0",
                    binding.group
                );
            }
        }

        let uniform_layout = time_binding.map(|binding| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame_uniforms_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: binding.binding,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = uniform_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        // 2 x f32, not normalized, tightly packed, zero offset.
        let position_location = program.position_attribute();
        let attributes = position_location.map(|location| {
            [wgpu::VertexAttribute {
                offset: 0,
                shader_location: location,
                format: wgpu::VertexFormat::Float32x2,
            }]
        });
        let buffers: Vec<wgpu::VertexBufferLayout> = attributes
            .as_ref()
            .map(|attributes| {
                vec![wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes,
                }]
            })
            .unwrap_or_default();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("main"),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
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

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let time = time_binding.zip(uniform_layout).map(|(binding, layout)| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("frame_uniforms"),
                size: std::mem::size_of::<FrameUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("frame_uniforms_bind_group"),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: binding.binding,
                    resource: buffer.as_entire_binding(),
                }],
            });
            TimeSlot { buffer, bind_group }
        });

        Self {
            pipeline,
            vertex_buffer,
            time,
            vertex_count: FULLSCREEN_QUAD.len() as u32,
            uses_position: position_location.is_some(),
        }
    }

    /// Upload elapsed seconds to the time uniform; a no-op when the shader
    /// does not declare one.
    pub fn write_time(&self, queue: &wgpu::Queue, elapsed: f32) {
        if let Some(ref time) = self.time {
            let uniforms = FrameUniforms {
                time: elapsed,
                _padding: [0.0; 3],
            };
            queue.write_buffer(&time.buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Whether the vertex stage consumes the position attribute.
    pub fn uses_position(&self) -> bool {
        self.uses_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_quad_covers_clip_space() {
        assert_eq!(FULLSCREEN_QUAD.len(), 6);
        for vertex in FULLSCREEN_QUAD {
            for component in vertex.position {
                assert!(component == 1.0 || component == -1.0);
            }
        }
        // Both winding corners are present.
        assert!(FULLSCREEN_QUAD.iter().any(|v| v.position == [-1.0, 1.0]));
        assert!(FULLSCREEN_QUAD.iter().any(|v| v.position == [1.0, -1.0]));
    }
}
