//! Knowledge base domain - prebuilt vector index over course material

mod document;
mod entity;
mod provider;

pub use document::DocumentChunk;
pub use entity::{IndexManifest, IndexStats, ScoredChunk};
pub use provider::VectorIndex;
