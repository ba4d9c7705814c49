use crate::render::TargetFormats;
use crate::scene::Topology;

use super::common::{
    build_pipeline, color_streams, uniform_entry, uniform_size, ColorUniform, PipelineSpec,
};

/// Flat per-vertex colour program, in line and triangle variants.
///
/// Bind group 0, binding 0: [`ColorUniform`] (vertex).
pub struct ColorProgram {
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ColorProgram {
    pub fn new(device: &wgpu::Device, formats: TargetFormats) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery color shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/color.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery color bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                uniform_size::<ColorUniform>(),
            )],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery color pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffers = color_streams();

        let lines = build_pipeline(
            device,
            PipelineSpec {
                label: "orrery color lines pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &buffers,
                topology: wgpu::PrimitiveTopology::LineList,
                formats,
            },
        );

        let triangles = build_pipeline(
            device,
            PipelineSpec {
                label: "orrery color triangles pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
                formats,
            },
        );

        Self {
            lines,
            triangles,
            bind_group_layout,
        }
    }

    #[inline]
    pub fn pipeline(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Lines => &self.lines,
            Topology::Triangles => &self.triangles,
        }
    }

    /// Creates a uniform buffer sized for [`ColorUniform`] and its bind group.
    pub fn create_binding(
        &self,
        device: &wgpu::Device,
        label: &str,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<ColorUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        (ubo, bind_group)
    }
}
