//! GPU rendering subsystem.
//!
//! Uploads meshes and textures, owns the shader programs and records the
//! scene pass. The per-frame draw sequence comes from `scene`; this module
//! only turns it into wgpu commands.
//!
//! Convention:
//! - right-handed world space, camera looks down -Z
//! - clip-space depth in [0, 1], cleared to 1.0, `Less` test

mod ctx;
mod mesh;
pub mod programs;
mod scene;
mod texture;

pub use ctx::{RenderCtx, RenderTarget, TargetFormats, Viewport};
pub use mesh::GpuMesh;
pub use programs::{ColorProgram, LitProgram};
pub use scene::{GpuScene, PassSink};
pub use texture::GpuTexture;
