use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

use crate::input::{InputFrame, InputState, Key};

/// Fly-camera parameters.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vec3,

    /// Yaw in radians; `PI` looks down -Z.
    pub horizontal_angle: f32,

    /// Pitch in radians.
    pub vertical_angle: f32,

    /// Vertical field of view in degrees.
    pub fov_degrees: f32,

    /// Movement speed in units per second.
    pub speed: f32,

    /// Radians per unit of pointer motion.
    pub mouse_speed: f32,

    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            horizontal_angle: PI,
            vertical_angle: 0.0,
            fov_degrees: 45.0,
            speed: 3.0,
            mouse_speed: 0.005,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// Keyboard/mouse camera. Owns the current view and projection matrices.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    config: CameraConfig,
    position: Vec3,
    horizontal_angle: f32,
    vertical_angle: f32,
    view: Mat4,
    projection: Mat4,
}

const FORWARD: [Key; 2] = [Key::ArrowUp, Key::W];
const BACKWARD: [Key; 2] = [Key::ArrowDown, Key::S];
const RIGHT: [Key; 2] = [Key::ArrowRight, Key::D];
const LEFT: [Key; 2] = [Key::ArrowLeft, Key::A];

impl FlyCamera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: config.position,
            horizontal_angle: config.horizontal_angle,
            vertical_angle: config.vertical_angle,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            config,
        };
        camera.rebuild(aspect);
        camera
    }

    /// Applies this frame's pointer motion and held keys, then rebuilds the matrices.
    pub fn update_from_input(
        &mut self,
        input: &InputState,
        frame: &InputFrame,
        dt: f32,
        aspect: f32,
    ) {
        let (dx, dy) = frame.pointer_delta;
        self.horizontal_angle -= self.config.mouse_speed * dx;
        self.vertical_angle -= self.config.mouse_speed * dy;

        let direction = self.direction();
        let right = self.right();
        let step = dt * self.config.speed;

        if input.any_down(&FORWARD) {
            self.position += direction * step;
        }
        if input.any_down(&BACKWARD) {
            self.position -= direction * step;
        }
        if input.any_down(&RIGHT) {
            self.position += right * step;
        }
        if input.any_down(&LEFT) {
            self.position -= right * step;
        }

        self.rebuild(aspect);
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit look direction from spherical angles.
    pub fn direction(&self) -> Vec3 {
        let (h, v) = (self.horizontal_angle, self.vertical_angle);
        Vec3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    fn rebuild(&mut self, aspect: f32) {
        let direction = self.direction();
        let up = self.right().cross(direction);
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 4.0 / 3.0 };

        self.view = Mat4::look_at_rh(self.position, self.position + direction, up);
        self.projection = Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            aspect,
            self.config.z_near,
            self.config.z_far,
        );
    }
}
