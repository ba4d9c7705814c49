//! Orrery engine crate.
//!
//! CPU-side mesh indexing and per-frame transform composition, plus the
//! platform + GPU runtime that draws the result.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod assets;
pub mod camera;
pub mod mesh;
pub mod render;
pub mod scene;

mod error;

pub use error::EngineError;
