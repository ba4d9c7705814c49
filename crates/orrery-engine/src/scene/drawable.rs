use super::pose::PoseRule;

/// Position of an object in the composer's draw order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ObjectId(pub usize);

/// Handle to uploaded geometry, resolved by the draw sink.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GeometryId(pub usize);

/// Shader program an object is drawn with.
///
/// The program fixes both the attribute layout and the uniform set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramKind {
    /// Position + colour attributes, one `mvp` uniform.
    FlatColor,
    /// Position + uv + normal attributes, textured and lit.
    Lit,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Lines,
    Triangles,
}

/// A named geometry/program pair and the rule that places it each frame.
#[derive(Debug, Clone)]
pub struct DrawableObject {
    pub name: String,
    pub geometry: GeometryId,
    pub program: ProgramKind,
    pub pose: PoseRule,
    pub topology: Topology,
}

impl DrawableObject {
    pub fn new(
        name: impl Into<String>,
        geometry: GeometryId,
        program: ProgramKind,
        topology: Topology,
        pose: PoseRule,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            program,
            pose,
            topology,
        }
    }
}
