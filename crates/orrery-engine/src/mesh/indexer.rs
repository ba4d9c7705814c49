use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::{Vec2, Vec3};

use crate::error::EngineError;

use super::RawVertex;

/// Deduplicated vertex array plus the index sequence that rebuilds the raw stream.
///
/// Invariants:
/// - `vertices` are pairwise distinct under [`RawVertex`] equality
/// - `vertices` is in first-occurrence order of the raw stream
/// - `indices.len()` equals the raw vertex count and every index is in range
///
/// Built once at load time and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    vertices: Vec<RawVertex>,
    indices: Vec<u32>,
}

impl IndexedMesh {
    /// Indexes an already-zipped raw vertex stream.
    pub fn from_raw(raw: &[RawVertex]) -> Self {
        let mut lookup: HashMap<RawVertex, u32> = HashMap::with_capacity(raw.len());
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(raw.len());

        for vertex in raw {
            let index = match lookup.entry(*vertex) {
                Entry::Occupied(slot) => *slot.get(),
                Entry::Vacant(slot) => {
                    let next = vertices.len() as u32;
                    vertices.push(*vertex);
                    *slot.insert(next)
                }
            };
            indices.push(index);
        }

        log::debug!(
            "indexed {} raw vertices into {} unique",
            indices.len(),
            vertices.len()
        );

        Self { vertices, indices }
    }

    #[inline]
    pub fn vertices(&self) -> &[RawVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position stream for the unique vertices.
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Texture coordinate stream for the unique vertices.
    pub fn uvs(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| v.uv).collect()
    }

    /// Normal stream for the unique vertices.
    pub fn normals(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.normal).collect()
    }
}

/// Builds an [`IndexedMesh`] from three aligned per-corner attribute streams.
///
/// Empty streams produce an empty mesh. Streams of different length fail with
/// [`EngineError::InputLengthMismatch`].
pub fn index_vertices(
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> Result<IndexedMesh, EngineError> {
    if positions.len() != uvs.len() || positions.len() != normals.len() {
        return Err(EngineError::InputLengthMismatch {
            positions: positions.len(),
            uvs: uvs.len(),
            normals: normals.len(),
        });
    }

    let raw: Vec<RawVertex> = positions
        .iter()
        .zip(uvs)
        .zip(normals)
        .map(|((p, t), n)| RawVertex::new(*p, *t, *n))
        .collect();

    Ok(IndexedMesh::from_raw(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streams(raw: &[RawVertex]) -> (Vec<Vec3>, Vec<Vec2>, Vec<Vec3>) {
        (
            raw.iter().map(|v| v.position).collect(),
            raw.iter().map(|v| v.uv).collect(),
            raw.iter().map(|v| v.normal).collect(),
        )
    }

    fn index(raw: &[RawVertex]) -> IndexedMesh {
        let (p, t, n) = streams(raw);
        index_vertices(&p, &t, &n).unwrap()
    }

    /// Two triangles of a quad, as a naive OBJ loader emits them.
    fn quad() -> Vec<RawVertex> {
        let n = Vec3::Z;
        let a = RawVertex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0), n);
        let b = RawVertex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0), n);
        let c = RawVertex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0), n);
        let d = RawVertex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0), n);
        vec![a, b, c, a, c, d]
    }

    /// Shared position, diverging normals: a hard edge that must not be welded.
    fn hard_edge() -> Vec<RawVertex> {
        let p = Vec3::new(1.0, 1.0, 1.0);
        vec![
            RawVertex::new(p, Vec2::ZERO, Vec3::X),
            RawVertex::new(p, Vec2::ZERO, Vec3::Y),
            RawVertex::new(p, Vec2::ZERO, Vec3::X),
            RawVertex::new(p, Vec2::ZERO, Vec3::Z),
        ]
    }

    fn check_properties(raw: &[RawVertex], mesh: &IndexedMesh) {
        assert_eq!(mesh.indices().len(), raw.len());
        for &i in mesh.indices() {
            assert!((i as usize) < mesh.vertices().len());
        }
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                let same_vertex = raw[i] == raw[j];
                let same_index = mesh.indices()[i] == mesh.indices()[j];
                assert_eq!(same_vertex, same_index, "raw positions {i} and {j}");
            }
        }
        for (k, v) in mesh.vertices().iter().enumerate() {
            let first = mesh
                .indices()
                .iter()
                .position(|&i| i as usize == k)
                .expect("every unique vertex is referenced");
            assert_eq!(*v, raw[first]);
        }
        for (a, va) in mesh.vertices().iter().enumerate() {
            for vb in &mesh.vertices()[a + 1..] {
                assert_ne!(va, vb);
            }
        }
    }

    #[test]
    fn identical_vertices_collapse() {
        let v = RawVertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mesh = index(&[v, v, v]);
        assert_eq!(mesh.vertices().len(), 1);
        assert_eq!(mesh.indices(), &[0, 0, 0]);
    }

    #[test]
    fn uv_only_difference_keeps_vertices_apart() {
        let raw = [
            RawVertex::new(Vec3::ZERO, Vec2::new(0.0, 0.0), Vec3::Z),
            RawVertex::new(Vec3::ZERO, Vec2::new(0.5, 0.0), Vec3::Z),
            RawVertex::new(Vec3::ZERO, Vec2::new(1.0, 0.0), Vec3::Z),
        ];
        let mesh = index(&raw);
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn quad_shares_diagonal() {
        let raw = quad();
        let mesh = index(&raw);
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
        check_properties(&raw, &mesh);
    }

    #[test]
    fn hard_edges_are_not_welded() {
        let raw = hard_edge();
        let mesh = index(&raw);
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 0, 2]);
        check_properties(&raw, &mesh);
    }

    #[test]
    fn indexing_is_deterministic() {
        let mut raw = quad();
        raw.extend(hard_edge());
        raw.extend(quad());
        let first = index(&raw);
        let second = index(&raw);
        assert_eq!(first, second);
        check_properties(&raw, &first);
    }

    #[test]
    fn empty_streams_give_empty_mesh() {
        let mesh = index_vertices(&[], &[], &[]).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.vertices().is_empty());
        assert!(mesh.indices().is_empty());
    }

    #[test]
    fn mismatched_streams_fail() {
        let err = index_vertices(&[Vec3::ZERO, Vec3::ONE], &[Vec2::ZERO], &[Vec3::Z, Vec3::Z])
            .unwrap_err();
        match err {
            EngineError::InputLengthMismatch { positions, uvs, normals } => {
                assert_eq!((positions, uvs, normals), (2, 1, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn split_streams_follow_vertex_order() {
        let mesh = index(&quad());
        assert_eq!(mesh.positions()[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.uvs()[3], Vec2::new(0.0, 1.0));
        assert!(mesh.normals().iter().all(|n| *n == Vec3::Z));
    }
}
