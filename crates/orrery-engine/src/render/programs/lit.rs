use crate::render::{GpuTexture, TargetFormats};

use super::common::{
    build_pipeline, lit_streams, uniform_entry, uniform_size, LitUniform, PipelineSpec,
};

/// Textured, lit triangle program.
///
/// Bind group 0:
/// - binding 0: [`LitUniform`] (vertex + fragment)
/// - binding 1: diffuse texture
/// - binding 2: diffuse sampler
pub struct LitProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl LitProgram {
    pub fn new(device: &wgpu::Device, formats: TargetFormats) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery lit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery lit bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    uniform_size::<LitUniform>(),
                ),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery lit pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = build_pipeline(
            device,
            PipelineSpec {
                label: "orrery lit pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &lit_streams(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                formats,
            },
        );

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Creates a uniform buffer sized for [`LitUniform`] and a bind group
    /// pairing it with `texture`.
    pub fn create_binding(
        &self,
        device: &wgpu::Device,
        label: &str,
        texture: &GpuTexture,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<LitUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        (ubo, bind_group)
    }
}
