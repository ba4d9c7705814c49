//! Disk asset loading: OBJ geometry and texture images.
//!
//! Loaders produce plain CPU data. GPU upload lives in `render`.

mod obj;
mod texture;

pub use obj::{load_obj, parse_obj, ObjOptions, RawStreams};
pub use texture::{load_texture, TextureImage};
