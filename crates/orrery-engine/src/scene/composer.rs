use glam::{Mat4, Vec3, Vec4};

use crate::error::EngineError;

use super::context::FrameContext;
use super::drawable::{DrawableObject, GeometryId, ObjectId, ProgramKind, Topology};
use super::pose::{with_translation, PoseRule};
use super::sink::DrawSink;

/// Composer parameters shared by all objects.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Light position in camera space. Lit objects receive its world-space
    /// image, and `PoseRule::CameraLight` objects are placed on it.
    pub light_camera_space: Vec3,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            light_camera_space: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Uniform values for one object, shaped by its program.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ObjectUniforms {
    Flat {
        mvp: Mat4,
    },
    Lit {
        mvp: Mat4,
        model: Mat4,
        view: Mat4,
        light_world: Vec3,
    },
}

impl ObjectUniforms {
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        match self {
            ObjectUniforms::Flat { mvp } | ObjectUniforms::Lit { mvp, .. } => *mvp,
        }
    }
}

/// Everything a sink needs to draw one object.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectDraw {
    pub object: ObjectId,
    pub geometry: GeometryId,
    pub program: ProgramKind,
    pub topology: Topology,
    pub uniforms: ObjectUniforms,
}

/// Matrices for one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub frame_index: u64,
    pub light_world: Vec3,
    pub draws: Vec<ObjectDraw>,
}

impl FramePlan {
    /// Drives `sink` through bind → uniforms → draw → release for every object,
    /// in order. The first sink error aborts the frame.
    pub fn submit<S: DrawSink + ?Sized>(&self, sink: &mut S) -> Result<(), EngineError> {
        for draw in &self.draws {
            sink.bind(draw)?;
            sink.set_uniforms(draw)?;
            sink.draw(draw)?;
            sink.release(draw)?;
        }
        Ok(())
    }
}

/// Ordered set of drawable objects and the per-frame pose derivation.
#[derive(Debug, Clone, Default)]
pub struct FrameComposer {
    config: ComposerConfig,
    objects: Vec<DrawableObject>,
}

impl FrameComposer {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
        }
    }

    /// Appends an object; objects are drawn in insertion order.
    pub fn push(&mut self, object: DrawableObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    #[inline]
    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    /// Derives every object's uniforms from the single `ctx` snapshot and
    /// advances accumulated rotations.
    pub fn compose(&mut self, ctx: &FrameContext) -> FramePlan {
        let view = ctx.view;
        let projection = ctx.projection;
        let view_inv = view.inverse();
        let light_world = (view_inv * self.config.light_camera_space.extend(1.0)).truncate();

        let mut draws = Vec::with_capacity(self.objects.len());

        for (index, object) in self.objects.iter_mut().enumerate() {
            let (model, mvp) = match &mut object.pose {
                PoseRule::Spin(spin) => {
                    let model = spin.model();
                    spin.advance();
                    (model, projection * view * model)
                }
                PoseRule::ScreenAnchored { offset } => {
                    let pose = with_translation(view, *offset);
                    (view_inv * pose, projection * pose)
                }
                PoseRule::CameraLight => {
                    let pose = with_translation(view_inv, light_world.extend(1.0));
                    (pose, projection * view * pose)
                }
            };

            let uniforms = match object.program {
                ProgramKind::FlatColor => ObjectUniforms::Flat { mvp },
                ProgramKind::Lit => ObjectUniforms::Lit {
                    mvp,
                    model,
                    view,
                    light_world,
                },
            };

            draws.push(ObjectDraw {
                object: ObjectId(index),
                geometry: object.geometry,
                program: object.program,
                topology: object.topology,
                uniforms,
            });
        }

        FramePlan {
            frame_index: ctx.frame_index,
            light_world,
            draws,
        }
    }

    /// Composes and submits one frame.
    pub fn frame<S: DrawSink + ?Sized>(
        &mut self,
        ctx: &FrameContext,
        sink: &mut S,
    ) -> Result<FramePlan, EngineError> {
        let plan = self.compose(ctx);
        plan.submit(sink)?;
        Ok(plan)
    }
}

/// Screen-corner offset used for the axis gizmo: right of centre, below, one
/// unit in front of the camera.
pub const DEFAULT_GIZMO_OFFSET: Vec4 = Vec4::new(0.43, -0.33, -1.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::pose::Spin;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Bind(usize),
        Uniforms(usize),
        Draw(usize),
        Release(usize),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
        bound: Option<usize>,
        fail_draw_of: Option<usize>,
    }

    impl DrawSink for RecordingSink {
        fn bind(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
            if let Some(prev) = self.bound {
                return Err(EngineError::Gpu(format!("object {prev} still bound")));
            }
            self.bound = Some(draw.object.0);
            self.calls.push(Call::Bind(draw.object.0));
            Ok(())
        }

        fn set_uniforms(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
            self.calls.push(Call::Uniforms(draw.object.0));
            Ok(())
        }

        fn draw(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
            if self.fail_draw_of == Some(draw.object.0) {
                return Err(EngineError::Gpu("device lost".into()));
            }
            self.calls.push(Call::Draw(draw.object.0));
            Ok(())
        }

        fn release(&mut self, draw: &ObjectDraw) -> Result<(), EngineError> {
            assert_eq!(self.bound.take(), Some(draw.object.0));
            self.calls.push(Call::Release(draw.object.0));
            Ok(())
        }
    }

    const AXES: usize = 0;
    const LIGHT: usize = 1;
    const MESH: usize = 2;

    fn playground() -> FrameComposer {
        let mut composer = FrameComposer::new(ComposerConfig::default());
        composer.push(DrawableObject::new(
            "axes",
            GeometryId(0),
            ProgramKind::FlatColor,
            Topology::Lines,
            PoseRule::ScreenAnchored { offset: DEFAULT_GIZMO_OFFSET },
        ));
        composer.push(DrawableObject::new(
            "light",
            GeometryId(1),
            ProgramKind::FlatColor,
            Topology::Triangles,
            PoseRule::CameraLight,
        ));
        composer.push(DrawableObject::new(
            "mesh",
            GeometryId(2),
            ProgramKind::Lit,
            Topology::Triangles,
            PoseRule::Spin(Spin::new(Vec3::new(-1.0, 0.0, 0.0), 0.0)),
        ));
        composer
    }

    fn camera_ctx() -> FrameContext {
        FrameContext {
            view: Mat4::look_at_rh(Vec3::new(4.0, 3.0, 3.0), Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh(45f32.to_radians(), 4.0 / 3.0, 0.1, 100.0),
            elapsed: 1.5,
            frame_index: 7,
        }
    }

    fn close(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn gizmo_translation_is_the_offset_under_identity_camera() {
        let mut composer = playground();
        let plan = composer.compose(&FrameContext::identity());
        let mvp = plan.draws[AXES].uniforms.mvp();
        assert_eq!(mvp.w_axis, Vec4::new(0.43, -0.33, -1.0, 1.0));
    }

    #[test]
    fn light_world_equals_camera_space_light_under_identity_view() {
        let mut composer = playground();
        let plan = composer.compose(&FrameContext::identity());
        assert_eq!(plan.light_world, Vec3::new(0.0, 0.0, 1.0));

        let cube = plan.draws[LIGHT].uniforms.mvp();
        assert_eq!(cube.w_axis, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn draws_follow_registration_order() {
        let mut composer = playground();
        let plan = composer.compose(&camera_ctx());
        let order: Vec<usize> = plan.draws.iter().map(|d| d.object.0).collect();
        assert_eq!(order, vec![AXES, LIGHT, MESH]);
        assert_eq!(plan.frame_index, 7);
        assert_eq!(plan.draws[AXES].topology, Topology::Lines);
        assert_eq!(plan.draws[MESH].program, ProgramKind::Lit);
    }

    #[test]
    fn every_object_uses_the_same_snapshot() {
        let ctx = camera_ctx();
        let (v, p) = (ctx.view, ctx.projection);
        let v_inv = v.inverse();

        let mut composer = playground();
        let plan = composer.compose(&ctx);

        let light_world = (v_inv * Vec4::new(0.0, 0.0, 1.0, 1.0)).truncate();
        assert!(plan.light_world.abs_diff_eq(light_world, 1e-5));

        let gizmo = p * with_translation(v, DEFAULT_GIZMO_OFFSET);
        assert!(close(plan.draws[AXES].uniforms.mvp(), gizmo));

        let cube = p * v * with_translation(v_inv, light_world.extend(1.0));
        assert!(close(plan.draws[LIGHT].uniforms.mvp(), cube));

        match plan.draws[MESH].uniforms {
            ObjectUniforms::Lit { mvp, model, view, light_world: lw } => {
                assert!(close(mvp, p * v * model));
                assert_eq!(model, Mat4::IDENTITY);
                assert_eq!(view, v);
                assert_eq!(lw, plan.light_world);
            }
            other => panic!("mesh should carry lit uniforms, got {other:?}"),
        }
    }

    #[test]
    fn light_cube_sits_on_the_light() {
        let ctx = camera_ctx();
        let mut composer = playground();
        let plan = composer.compose(&ctx);

        // The cube's origin lands where the light is, seen from the camera.
        let clip = plan.draws[LIGHT].uniforms.mvp() * Vec4::W;
        let expected = ctx.projection * ctx.view * plan.light_world.extend(1.0);
        assert!(clip.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn spinning_object_accumulates_across_frames() {
        let mut composer = FrameComposer::new(ComposerConfig::default());
        composer.push(DrawableObject::new(
            "spinner",
            GeometryId(0),
            ProgramKind::FlatColor,
            Topology::Triangles,
            PoseRule::Spin(Spin::new(Vec3::Z, 90.0)),
        ));

        let ctx = FrameContext::identity();
        let first = composer.compose(&ctx).draws[0].uniforms.mvp();
        let second = composer.compose(&ctx).draws[0].uniforms.mvp();

        assert_eq!(first, Mat4::IDENTITY);
        assert!(close(second, Mat4::from_rotation_z(90f32.to_radians())));
        match composer.objects()[0].pose {
            PoseRule::Spin(spin) => assert_eq!(spin.angle_degrees(), 180.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn sink_sees_bind_uniforms_draw_release_per_object() {
        let mut composer = playground();
        let mut sink = RecordingSink::default();
        composer.frame(&camera_ctx(), &mut sink).unwrap();

        let mut expected = Vec::new();
        for i in [AXES, LIGHT, MESH] {
            expected.extend([Call::Bind(i), Call::Uniforms(i), Call::Draw(i), Call::Release(i)]);
        }
        assert_eq!(sink.calls, expected);
        assert_eq!(sink.bound, None);
    }

    #[test]
    fn sink_failure_aborts_the_frame() {
        let mut composer = playground();
        let mut sink = RecordingSink { fail_draw_of: Some(LIGHT), ..Default::default() };

        let err = composer.frame(&camera_ctx(), &mut sink).unwrap_err();
        assert!(matches!(err, EngineError::Gpu(_)));
        assert!(!sink.calls.contains(&Call::Bind(MESH)));
        assert_eq!(sink.calls.last(), Some(&Call::Uniforms(LIGHT)));
    }
}
