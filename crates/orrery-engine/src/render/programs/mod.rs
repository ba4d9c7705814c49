//! Shader programs: embedded WGSL, pipelines and uniform layouts.
//!
//! A program's uniforms live in bind group 0; the uniform block layouts are
//! the Rust structs re-exported here.

mod color;
mod common;
mod lit;

pub use color::ColorProgram;
pub use common::{ColorUniform, LitUniform};
pub use lit::LitProgram;
