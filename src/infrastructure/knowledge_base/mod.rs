//! Vector index implementations

mod in_memory;
mod loader;

pub use in_memory::InMemoryVectorIndex;
pub use loader::{IndexLoader, CHUNKS_FILE, MANIFEST_FILE};
