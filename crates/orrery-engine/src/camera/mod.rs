//! First-person camera driven by keyboard and mouse.
//!
//! The camera is the only source of view and projection matrices. It is
//! updated once per frame before the frame context is built.

mod fly;

pub use fly::{CameraConfig, FlyCamera};
