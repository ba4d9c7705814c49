use std::io::BufRead;
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::error::EngineError;

/// Per-corner attribute streams, aligned by index, with no sharing between faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStreams {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl RawStreams {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// OBJ import options.
#[derive(Debug, Clone)]
pub struct ObjOptions {
    /// Replace `v` with `1 - v` so textures with a top-left origin map correctly.
    pub flip_v: bool,

    /// Uniform scale applied to positions.
    pub scale: f32,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            flip_v: true,
            scale: 1.0,
        }
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads an OBJ file and expands it into per-corner streams.
///
/// All models in the file are concatenated in file order. Texture coordinates
/// and normals are required.
pub fn load_obj(path: impl AsRef<Path>, options: &ObjOptions) -> Result<RawStreams, EngineError> {
    let path = path.as_ref();
    let (models, _materials) =
        tobj::load_obj(path, &load_options()).map_err(|e| EngineError::asset(path, e))?;

    let streams = expand(path, &models, options)?;
    log::info!(
        "loaded '{}': {} models, {} triangles",
        path.display(),
        models.len(),
        streams.len() / 3
    );
    Ok(streams)
}

/// Parses OBJ text from a reader. Material libraries are not resolved.
pub fn parse_obj<R: BufRead>(
    reader: &mut R,
    options: &ObjOptions,
) -> Result<RawStreams, EngineError> {
    let source = Path::new("<memory>");
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| EngineError::asset(source, e))?;

    expand(source, &models, options)
}

fn expand(
    path: &Path,
    models: &[tobj::Model],
    options: &ObjOptions,
) -> Result<RawStreams, EngineError> {
    let mut out = RawStreams::default();

    for model in models {
        let mesh = &model.mesh;
        let corners = mesh.indices.len();

        if mesh.texcoord_indices.len() != corners {
            return Err(EngineError::asset(
                path,
                format!("model '{}' has no texture coordinates", model.name),
            ));
        }
        if mesh.normal_indices.len() != corners {
            return Err(EngineError::asset(
                path,
                format!("model '{}' has no normals", model.name),
            ));
        }

        out.positions.reserve(corners);
        out.uvs.reserve(corners);
        out.normals.reserve(corners);

        for corner in 0..corners {
            let p = read3(&mesh.positions, mesh.indices[corner])
                .ok_or_else(|| EngineError::asset(path, "position index out of range"))?;
            let t = read2(&mesh.texcoords, mesh.texcoord_indices[corner])
                .ok_or_else(|| EngineError::asset(path, "texcoord index out of range"))?;
            let n = read3(&mesh.normals, mesh.normal_indices[corner])
                .ok_or_else(|| EngineError::asset(path, "normal index out of range"))?;

            let t = if options.flip_v { Vec2::new(t.x, 1.0 - t.y) } else { t };

            out.positions.push(p * options.scale);
            out.uvs.push(t);
            out.normals.push(n);
        }
    }

    Ok(out)
}

fn read3(data: &[f32], index: u32) -> Option<Vec3> {
    let i = index as usize * 3;
    data.get(i..i + 3).map(Vec3::from_slice)
}

fn read2(data: &[f32], index: u32) -> Option<Vec2> {
    let i = index as usize * 2;
    data.get(i..i + 2).map(Vec2::from_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    fn parse(src: &str, options: &ObjOptions) -> Result<RawStreams, EngineError> {
        parse_obj(&mut Cursor::new(src.as_bytes()), options)
    }

    #[test]
    fn expands_every_face_corner() {
        let s = parse(QUAD, &ObjOptions { flip_v: false, scale: 1.0 }).unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(s.uvs.len(), 6);
        assert_eq!(s.normals.len(), 6);
        // Corner 0 and 3 reference the same OBJ vertex but are emitted twice.
        assert_eq!(s.positions[0], s.positions[3]);
        assert_eq!(s.positions[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(s.uvs[5], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn flips_v_and_scales() {
        let s = parse(QUAD, &ObjOptions { flip_v: true, scale: 0.5 }).unwrap();
        assert_eq!(s.uvs[0], Vec2::new(0.0, 1.0));
        assert_eq!(s.uvs[2], Vec2::new(1.0, 0.0));
        assert_eq!(s.positions[2], Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn quads_are_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1 4/1/1\n";
        let s = parse(src, &ObjOptions::default()).unwrap();
        assert_eq!(s.len(), 6);
    }

    #[test]
    fn missing_normals_is_an_asset_error() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nf 1/1 2/1 3/1\n";
        let err = parse(src, &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::AssetLoad { .. }), "{err}");
    }

    #[test]
    fn missing_texcoords_is_an_asset_error() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let err = parse(src, &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::AssetLoad { .. }), "{err}");
        assert!(err.to_string().contains("texture coordinates"), "{err}");
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let err = load_obj("does/not/exist.obj", &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::AssetLoad { .. }));
    }
}
