use crate::error::EngineError;

use super::composer::ObjectDraw;

/// Drawing collaborator driven by [`FramePlan::submit`](super::FramePlan::submit).
///
/// For each object the composer calls, in order: `bind`, `set_uniforms`,
/// `draw`, `release`. Implementations may rely on that sequence and should
/// reject a `bind` while another object is still bound; attribute layouts
/// differ between programs and must not leak from one object to the next.
pub trait DrawSink {
    /// Selects the object's program and binds its vertex/index buffers.
    fn bind(&mut self, draw: &ObjectDraw) -> Result<(), EngineError>;

    /// Uploads the object's transform uniforms.
    fn set_uniforms(&mut self, draw: &ObjectDraw) -> Result<(), EngineError>;

    /// Issues the draw call with the object's topology.
    fn draw(&mut self, draw: &ObjectDraw) -> Result<(), EngineError>;

    /// Drops the bindings made by `bind`.
    fn release(&mut self, draw: &ObjectDraw) -> Result<(), EngineError>;
}
