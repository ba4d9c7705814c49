use glam::{Mat4, Vec3, Vec4};

/// Rotation about a fixed axis, accumulated per frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    axis: Vec3,
    angle_degrees: f32,
    step_degrees: f32,
}

impl Spin {
    /// `axis` is normalized; a zero axis falls back to +Y.
    pub fn new(axis: Vec3, step_degrees: f32) -> Self {
        Self {
            axis: axis.try_normalize().unwrap_or(Vec3::Y),
            angle_degrees: 0.0,
            step_degrees,
        }
    }

    #[inline]
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        Mat4::from_axis_angle(self.axis, self.angle_degrees.to_radians())
    }

    /// Adds one step and wraps into `[0, 360)`.
    pub fn advance(&mut self) {
        self.angle_degrees = (self.angle_degrees + self.step_degrees).rem_euclid(360.0);
    }
}

/// How an object's pose is derived from the frame's camera state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PoseRule {
    /// World-space model matrix from an accumulated rotation.
    /// Final transform: `P · V · M`.
    Spin(Spin),

    /// The view matrix with its translation column replaced by a camera-space
    /// offset (`w = 1`). Final transform: `P · pose`. Stays at a fixed spot on
    /// screen whatever the camera orientation.
    ScreenAnchored { offset: Vec4 },

    /// Inverse view with its translation replaced by the frame's world-space
    /// light position. Final transform: `P · V · pose`.
    CameraLight,
}

/// Returns `m` with column 3 (translation) replaced by `t`.
#[inline]
pub fn with_translation(m: Mat4, t: Vec4) -> Mat4 {
    let mut out = m;
    out.w_axis = t;
    out
}
