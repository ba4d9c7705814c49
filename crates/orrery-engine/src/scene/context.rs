use glam::Mat4;

use crate::time::FrameTime;

/// Camera snapshot shared by every object drawn in one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameContext {
    pub view: Mat4,
    pub projection: Mat4,

    /// Seconds since the frame clock started.
    pub elapsed: f32,

    pub frame_index: u64,
}

impl FrameContext {
    pub fn new(view: Mat4, projection: Mat4, time: &FrameTime) -> Self {
        Self {
            view,
            projection,
            elapsed: time.elapsed,
            frame_index: time.frame_index,
        }
    }

    /// Identity view and projection at frame zero.
    pub fn identity() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            elapsed: 0.0,
            frame_index: 0,
        }
    }
}
