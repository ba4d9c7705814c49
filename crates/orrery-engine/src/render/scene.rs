use crate::error::EngineError;
use crate::scene::{
    DrawSink, DrawableObject, GeometryId, ObjectDraw, ObjectId, ObjectUniforms, ProgramKind,
    Topology,
};

use super::programs::{ColorProgram, ColorUniform, LitProgram, LitUniform};
use super::{GpuMesh, GpuTexture, RenderCtx, RenderTarget, TargetFormats};

/// GPU resources for a composed scene: uploaded geometry, the diffuse
/// texture, the programs and one uniform buffer per object.
///
/// Every object owns its uniform buffer, so per-object writes made while one
/// pass is recorded do not overwrite each other.
pub struct GpuScene {
    meshes: Vec<GpuMesh>,
    texture: Option<GpuTexture>,

    programs_formats: Option<TargetFormats>,
    programs: Option<Programs>,
    bindings: Vec<ObjectBinding>,
}

struct Programs {
    lit: LitProgram,
    color: ColorProgram,
}

struct ObjectBinding {
    program: ProgramKind,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Default for GpuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuScene {
    /// Dark blue background.
    pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.0, b: 0.4, a: 1.0 };

    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            texture: None,
            programs_formats: None,
            programs: None,
            bindings: Vec::new(),
        }
    }

    /// Registers uploaded geometry and returns its handle.
    pub fn add_mesh(&mut self, mesh: GpuMesh) -> GeometryId {
        self.meshes.push(mesh);
        GeometryId(self.meshes.len() - 1)
    }

    /// Sets the texture sampled by lit objects. Existing bindings are rebuilt
    /// on the next [`prepare`](Self::prepare).
    pub fn set_texture(&mut self, texture: GpuTexture) {
        self.texture = Some(texture);
        self.bindings.clear();
    }

    /// Builds programs for the current target formats and a uniform binding
    /// for each of `objects`. Cheap when nothing changed.
    pub fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        objects: &[DrawableObject],
    ) -> Result<(), EngineError> {
        self.ensure_programs(ctx);
        self.ensure_bindings(ctx, objects)
    }

    /// Begins the scene's render pass, clearing colour and depth, and returns
    /// the sink that records draws into it. A multisampled target is resolved
    /// when the pass ends.
    pub fn begin_pass<'p>(
        &'p self,
        ctx: &RenderCtx<'p>,
        target: &'p mut RenderTarget<'_>,
    ) -> Result<PassSink<'p>, EngineError> {
        let programs = self
            .programs
            .as_ref()
            .ok_or_else(|| EngineError::Gpu("scene pass begun before prepare".into()))?;

        let pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: target.resolve_view,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(Self::CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Ok(PassSink {
            queue: ctx.queue,
            pass,
            scene: self,
            programs,
            tracker: BindTracker::default(),
        })
    }

    fn ensure_programs(&mut self, ctx: &RenderCtx<'_>) {
        let formats = ctx.formats;
        if self.programs_formats == Some(formats) && self.programs.is_some() {
            return;
        }

        self.programs = Some(Programs {
            lit: LitProgram::new(ctx.device, formats),
            color: ColorProgram::new(ctx.device, formats),
        });
        self.programs_formats = Some(formats);

        // Bind groups reference the old layouts.
        self.bindings.clear();
    }

    fn ensure_bindings(
        &mut self,
        ctx: &RenderCtx<'_>,
        objects: &[DrawableObject],
    ) -> Result<(), EngineError> {
        let up_to_date = self.bindings.len() == objects.len()
            && self
                .bindings
                .iter()
                .zip(objects)
                .all(|(b, o)| b.program == o.program);
        if up_to_date {
            return Ok(());
        }

        let Some(programs) = self.programs.as_ref() else {
            return Err(EngineError::Gpu("programs not built".into()));
        };

        let mut bindings = Vec::with_capacity(objects.len());
        for object in objects {
            let label = format!("orrery {} uniforms", object.name);
            let (ubo, bind_group) = match object.program {
                ProgramKind::Lit => {
                    let texture = self.texture.as_ref().ok_or_else(|| {
                        EngineError::Gpu(format!("lit object '{}' has no texture", object.name))
                    })?;
                    programs.lit.create_binding(ctx.device, &label, texture)
                }
                ProgramKind::FlatColor => programs.color.create_binding(ctx.device, &label),
            };
            bindings.push(ObjectBinding {
                program: object.program,
                ubo,
                bind_group,
            });
        }

        log::debug!("built uniform bindings for {} objects", bindings.len());
        self.bindings = bindings;
        Ok(())
    }
}

/// [`DrawSink`] recording into one wgpu render pass.
///
/// `bind` selects the pipeline and vertex/index buffers, `set_uniforms`
/// writes the object's uniform buffer and binds its group, `draw` issues the
/// call and `release` ends the object. Out-of-sequence calls are errors.
pub struct PassSink<'p> {
    queue: &'p wgpu::Queue,
    pass: wgpu::RenderPass<'p>,
    scene: &'p GpuScene,
    programs: &'p Programs,
    tracker: BindTracker,
}

impl<'p> PassSink<'p> {
    /// Ends the pass. Fails if an object was left bound.
    pub fn finish(self) -> Result<(), EngineError> {
        self.tracker.finish()
    }

    fn binding(&self, object: ObjectId) -> Result<&'p ObjectBinding, EngineError> {
        self.scene
            .bindings
            .get(object.0)
            .ok_or_else(|| EngineError::Gpu(format!("object {} has no uniform binding", object.0)))
    }

    fn mesh(&self, geometry: GeometryId) -> Result<&'p GpuMesh, EngineError> {
        self.scene
            .meshes
            .get(geometry.0)
            .ok_or_else(|| EngineError::Gpu(format!("unknown geometry {}", geometry.0)))
    }

    fn pipeline(&self, draw: &ObjectDraw) -> Result<&'p wgpu::RenderPipeline, EngineError> {
        match (draw.program, draw.topology) {
            (ProgramKind::Lit, Topology::Triangles) => Ok(self.programs.lit.pipeline()),
            (ProgramKind::Lit, Topology::Lines) => Err(EngineError::Gpu(format!(
                "object {}: lit program only draws triangles",
                draw.object.0
            ))),
            (ProgramKind::FlatColor, topology) => Ok(self.programs.color.pipeline(topology)),
        }
    }
}

fn stream_count(program: ProgramKind) -> usize {
    match program {
        ProgramKind::Lit => 3,
        ProgramKind::FlatColor => 2,
    }
}

impl DrawSink for PassSink<'_> {
    fn bind(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
        self.tracker.bind(draw.object)?;

        let binding = self.binding(draw.object)?;
        if binding.program != draw.program {
            return Err(EngineError::Gpu(format!(
                "object {} bound with {:?} but prepared for {:?}",
                draw.object.0, draw.program, binding.program
            )));
        }

        let mesh = self.mesh(draw.geometry)?;
        if mesh.attributes().len() != stream_count(draw.program) {
            return Err(EngineError::Gpu(format!(
                "geometry {} has {} streams, {:?} needs {}",
                draw.geometry.0,
                mesh.attributes().len(),
                draw.program,
                stream_count(draw.program)
            )));
        }

        let pipeline = self.pipeline(draw)?;
        self.pass.set_pipeline(pipeline);

        // Zero-sized buffers cannot be sliced; an empty mesh draws nothing.
        if mesh.is_empty() {
            return Ok(());
        }
        for (slot, buffer) in mesh.attributes().iter().enumerate() {
            self.pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        if let Some(ibo) = mesh.index_buffer() {
            self.pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        }
        Ok(())
    }

    fn set_uniforms(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
        self.tracker.expect_bound(draw.object)?;
        let binding = self.binding(draw.object)?;

        match (binding.program, draw.uniforms) {
            (ProgramKind::FlatColor, ObjectUniforms::Flat { mvp }) => {
                let u = ColorUniform::new(mvp);
                self.queue.write_buffer(&binding.ubo, 0, bytemuck::bytes_of(&u));
            }
            (ProgramKind::Lit, ObjectUniforms::Lit { mvp, model, view, light_world }) => {
                let u = LitUniform::new(mvp, model, view, light_world);
                self.queue.write_buffer(&binding.ubo, 0, bytemuck::bytes_of(&u));
            }
            (program, _) => {
                return Err(EngineError::Gpu(format!(
                    "object {}: uniforms do not match {program:?}",
                    draw.object.0
                )));
            }
        }

        self.pass.set_bind_group(0, &binding.bind_group, &[]);
        Ok(())
    }

    fn draw(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
        self.tracker.expect_bound(draw.object)?;
        let mesh = self.mesh(draw.geometry)?;
        if mesh.is_empty() {
            return Ok(());
        }

        if mesh.index_buffer().is_some() {
            self.pass.draw_indexed(0..mesh.count(), 0, 0..1);
        } else {
            self.pass.draw(0..mesh.count(), 0..1);
        }
        Ok(())
    }

    fn release(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
        self.tracker.release(draw.object)
    }
}

/// Tracks which object currently holds the pass bindings.
#[derive(Debug, Default)]
struct BindTracker {
    bound: Option<ObjectId>,
}

impl BindTracker {
    fn bind(&mut self, object: ObjectId) -> Result<(), EngineError> {
        if let Some(current) = self.bound {
            return Err(EngineError::Gpu(format!(
                "object {} bound while object {} is still bound",
                object.0, current.0
            )));
        }
        self.bound = Some(object);
        Ok(())
    }

    fn expect_bound(&self, object: ObjectId) -> Result<(), EngineError> {
        match self.bound {
            Some(current) if current == object => Ok(()),
            Some(current) => Err(EngineError::Gpu(format!(
                "object {} used while object {} is bound",
                object.0, current.0
            ))),
            None => Err(EngineError::Gpu(format!("object {} used before bind", object.0))),
        }
    }

    fn release(&mut self, object: ObjectId) -> Result<(), EngineError> {
        self.expect_bound(object)?;
        self.bound = None;
        Ok(())
    }

    fn finish(&self) -> Result<(), EngineError> {
        match self.bound {
            Some(current) => Err(EngineError::Gpu(format!(
                "object {} still bound at end of pass",
                current.0
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_release_cycle() {
        let mut t = BindTracker::default();
        for i in 0..3 {
            t.bind(ObjectId(i)).unwrap();
            t.expect_bound(ObjectId(i)).unwrap();
            t.release(ObjectId(i)).unwrap();
        }
        t.finish().unwrap();
    }

    #[test]
    fn second_bind_without_release_fails() {
        let mut t = BindTracker::default();
        t.bind(ObjectId(0)).unwrap();
        assert!(matches!(t.bind(ObjectId(1)), Err(EngineError::Gpu(_))));
    }

    #[test]
    fn draw_before_bind_fails() {
        let t = BindTracker::default();
        assert!(t.expect_bound(ObjectId(2)).is_err());
    }

    #[test]
    fn releasing_another_object_fails() {
        let mut t = BindTracker::default();
        t.bind(ObjectId(0)).unwrap();
        assert!(t.release(ObjectId(1)).is_err());
        assert!(t.finish().is_err());
    }

    #[test]
    fn stream_counts_match_program_layouts() {
        assert_eq!(stream_count(ProgramKind::Lit), 3);
        assert_eq!(stream_count(ProgramKind::FlatColor), 2);
    }
}
