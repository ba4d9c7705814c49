//! Shared pipeline state, vertex layouts and uniform blocks.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::render::TargetFormats;

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) alpha: `src * a + dst * (1 - a)`.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth ─────────────────────────────────────────────────────────────────

/// Nearer fragments win; every program writes depth.
pub(super) fn depth_less(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── multisampling ──────────────────────────────────────────────────────────

/// Every sample covered; coverage is not derived from alpha.
pub(super) fn multisample(count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

// ── vertex streams ────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

fn stream(
    stride: usize,
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: stride as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// position, uv, normal: one buffer each, slots 0..3.
pub(super) fn lit_streams() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        stream(std::mem::size_of::<[f32; 3]>(), &POSITION_ATTRS),
        stream(std::mem::size_of::<[f32; 2]>(), &UV_ATTRS),
        stream(std::mem::size_of::<[f32; 3]>(), &NORMAL_ATTRS),
    ]
}

/// position, colour: one buffer each, slots 0..2.
pub(super) fn color_streams() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        stream(std::mem::size_of::<[f32; 3]>(), &POSITION_ATTRS),
        stream(std::mem::size_of::<[f32; 3]>(), &COLOR_ATTRS),
    ]
}

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LitUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub light_world: [f32; 4], // w unused, 16-byte alignment
}

impl LitUniform {
    pub fn new(mvp: Mat4, model: Mat4, view: Mat4, light_world: Vec3) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            light_world: light_world.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ColorUniform {
    pub mvp: [[f32; 4]; 4],
}

impl ColorUniform {
    pub fn new(mvp: Mat4) -> Self {
        Self { mvp: mvp.to_cols_array_2d() }
    }
}

/// Minimum binding size for a uniform block of type `T`.
pub(super) fn uniform_size<T>() -> Option<wgpu::BufferSize> {
    wgpu::BufferSize::new(std::mem::size_of::<T>() as u64)
}

pub(super) fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: Option<wgpu::BufferSize>,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: size,
        },
        count: None,
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

pub(super) struct PipelineSpec<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub layout: &'a wgpu::PipelineLayout,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub formats: TargetFormats,
}

pub(super) fn build_pipeline(
    device: &wgpu::Device,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),

        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: spec.formats.color,
                blend: Some(alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // both faces drawn
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(depth_less(spec.formats.depth)),
        multisample: multisample(spec.formats.sample_count),

        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LitUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ColorUniform>(), 64);
    }

    #[test]
    fn lit_uniform_keeps_column_major_order() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = LitUniform::new(Mat4::IDENTITY, model, Mat4::IDENTITY, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.light_world, [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn multisample_state_uses_target_count() {
        let ms = multisample(4);
        assert_eq!(ms.count, 4);
        assert_eq!(ms.mask, !0);
        assert!(!ms.alpha_to_coverage_enabled);
        assert_eq!(multisample(1), wgpu::MultisampleState::default());
    }

    #[test]
    fn lit_streams_use_distinct_locations() {
        let locations: Vec<u32> = lit_streams()
            .iter()
            .flat_map(|s| s.attributes.iter().map(|a| a.shader_location))
            .collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }
}
