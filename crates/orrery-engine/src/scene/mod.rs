//! Per-frame transform composition and ordered draw submission.
//!
//! Flow, once per frame:
//! 1. the application reads the camera once into a [`FrameContext`]
//! 2. [`FrameComposer::compose`] derives every object's matrices from that one
//!    snapshot into a [`FramePlan`]
//! 3. [`FramePlan::submit`] walks the plan in registration order and drives
//!    a [`DrawSink`] through bind → uniforms → draw → release per object

mod composer;
mod context;
mod drawable;
mod pose;
mod sink;

pub use composer::{
    ComposerConfig, FrameComposer, FramePlan, ObjectDraw, ObjectUniforms, DEFAULT_GIZMO_OFFSET,
};
pub use context::FrameContext;
pub use drawable::{DrawableObject, GeometryId, ObjectId, ProgramKind, Topology};
pub use pose::{with_translation, PoseRule, Spin};
pub use sink::DrawSink;
