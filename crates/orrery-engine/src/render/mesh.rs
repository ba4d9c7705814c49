use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::error::EngineError;
use crate::mesh::IndexedMesh;

/// Geometry uploaded to GPU buffers.
///
/// Each attribute lives in its own vertex buffer; buffer `i` feeds vertex
/// slot `i`, matching the program's attribute locations. Buffers are written
/// once here and never updated.
pub struct GpuMesh {
    attributes: Vec<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,

    /// Index count for indexed meshes, vertex count otherwise.
    count: u32,
}

impl GpuMesh {
    /// Uploads an indexed mesh as position/uv/normal streams plus a `u32`
    /// index buffer.
    pub fn from_indexed(device: &wgpu::Device, label: &str, mesh: &IndexedMesh) -> Self {
        let positions = mesh.positions();
        let uvs = mesh.uvs();
        let normals = mesh.normals();

        let attributes = vec![
            vertex_buffer(device, &format!("{label} positions"), bytemuck::cast_slice(&positions)),
            vertex_buffer(device, &format!("{label} uvs"), bytemuck::cast_slice(&uvs)),
            vertex_buffer(device, &format!("{label} normals"), bytemuck::cast_slice(&normals)),
        ];

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded mesh '{label}': {} vertices, {} indices",
            mesh.vertices().len(),
            mesh.indices().len()
        );

        Self {
            attributes,
            index_buffer: Some(index_buffer),
            count: mesh.indices().len() as u32,
        }
    }

    /// Uploads non-indexed position/colour streams.
    pub fn from_colored(
        device: &wgpu::Device,
        label: &str,
        positions: &[Vec3],
        colors: &[Vec3],
    ) -> Result<Self, EngineError> {
        if positions.len() != colors.len() {
            return Err(EngineError::Gpu(format!(
                "mesh '{label}': {} positions but {} colours",
                positions.len(),
                colors.len()
            )));
        }

        let attributes = vec![
            vertex_buffer(device, &format!("{label} positions"), bytemuck::cast_slice(positions)),
            vertex_buffer(device, &format!("{label} colours"), bytemuck::cast_slice(colors)),
        ];

        Ok(Self {
            attributes,
            index_buffer: None,
            count: positions.len() as u32,
        })
    }

    #[inline]
    pub fn attributes(&self) -> &[wgpu::Buffer] {
        &self.attributes
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn vertex_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::VERTEX,
    })
}
