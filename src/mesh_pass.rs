//! 3D mesh rendering pass with depth testing and vertex-color shading.
//!
//! The pass uses two bind groups:
//! - **Group 0**: camera uniforms (projection matrix, ambient term)
//! - **Group 1**: model uniforms (model-view and normal matrices), bound with a dynamic
//!   offset so every draw in a frame gets its own slot in one buffer
//!
//! Draw calls carry model-view matrices: the traversal's stack is seeded with the
//! camera view, so the projection is the only transform left for the shader.
//!
//! Faces are not culled. Thin parts such as the blades and the guard wires must stay
//! visible from both sides, and the shader flips normals on back faces.
//!
//! The pass owns a `Depth32Float` buffer that follows the surface size.

use glam::Mat4;

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};

/// Light green, the viewer's background.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.6,
    g: 1.0,
    b: 0.6,
    a: 1.0,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Camera uniforms, written once per frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// View-to-clip transform.
    pub proj: [[f32; 4]; 4],
    /// Minimum brightness of faces turned away from the eye.
    pub ambient: f32,
    pub _pad: [f32; 3],
}

/// Per-draw model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Object-to-view transform.
    pub model_view: [[f32; 4]; 4],
    /// Inverse transpose of `model_view`, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniforms {
    pub fn new(model_view: Mat4) -> Self {
        Self {
            model_view: model_view.to_cols_array_2d(),
            normal_matrix: model_view.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// A mesh to draw with its model-view transform.
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    pub model_view: Mat4,
}

/// Rounds `size` up to the next multiple of `alignment`.
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Handles 3D mesh rendering with depth testing.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Bytes between consecutive model uniform slots.
    model_stride: u64,
    /// Number of slots `model_buffer` can hold.
    model_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    ambient: f32,
}

impl MeshPass {
    const INITIAL_MODEL_SLOTS: usize = 16;

    /// Creates the pipeline, uniform buffers and a depth buffer at the current surface size.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
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
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
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

        // Model uniform buffer (group 1), one aligned slot per draw
        let model_stride = aligned_stride(
            std::mem::size_of::<ModelUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let (model_buffer, model_bind_group) = Self::create_model_slots(
            gpu,
            &model_bind_group_layout,
            model_stride,
            Self::INITIAL_MODEL_SLOTS,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity: Self::INITIAL_MODEL_SLOTS,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            ambient: 0.35,
        }
    }

    fn create_model_slots(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
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

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Grows the model buffer so it holds at least `draws` slots.
    fn ensure_model_capacity(&mut self, gpu: &GpuContext, draws: usize) {
        if draws <= self.model_capacity {
            return;
        }
        let slots = draws.next_power_of_two();
        log::debug!("growing model uniform buffer to {slots} slots");
        let (buffer, bind_group) =
            Self::create_model_slots(gpu, &self.model_bind_group_layout, self.model_stride, slots);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = slots;
    }

    /// Clears `target` to [`CLEAR_COLOR`] and draws every call with depth testing.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        proj: Mat4,
        draw_calls: &[DrawCall],
    ) {
        self.ensure_depth_size(gpu);
        self.ensure_model_capacity(gpu, draw_calls.len());

        let camera_uniforms = CameraUniforms {
            proj: proj.to_cols_array_2d(),
            ambient: self.ambient,
            _pad: [0.0; 3],
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        // Pack every draw's uniforms into its slot with one upload.
        let stride = self.model_stride as usize;
        let mut staging = vec![0u8; stride * draw_calls.len()];
        for (slot, call) in staging.chunks_exact_mut(stride).zip(draw_calls) {
            let uniforms = ModelUniforms::new(call.model_view);
            let bytes = bytemuck::bytes_of(&uniforms);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            gpu.queue.write_buffer(&self.model_buffer, 0, &staging);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (i, call) in draw_calls.iter().enumerate() {
            let offset = (i as u64 * self.model_stride) as u32;
            render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, call.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(call.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..call.mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(128, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(128, 64), 128);
    }

    #[test]
    fn uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 128);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_scale() {
        let model_view = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let uniforms = ModelUniforms::new(model_view);
        let normal_matrix = Mat4::from_cols_array_2d(&uniforms.normal_matrix);

        // A 45° surface stretched along X.
        let tangent = model_view.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        let normal = normal_matrix.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1e-5);
    }
}
