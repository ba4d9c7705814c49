//! CPU-side mesh data.
//!
//! Model loaders emit one attribute triple per face corner with no sharing
//! between faces. The indexer collapses identical triples into a unique vertex
//! array plus an index array, the layout uploaded to the GPU.

mod indexer;
mod vertex;

pub use indexer::{index_vertices, IndexedMesh};
pub use vertex::RawVertex;
