//! Vector index trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{IndexStats, ScoredChunk};
use crate::domain::error::DomainError;

/// Read-only nearest-neighbour index over chunk embeddings.
///
/// Implementations must return at most `top_k` chunks ordered by
/// descending similarity. An index holding no chunks returns an empty result.
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Get the index name
    fn name(&self) -> &str;

    /// Find the `top_k` chunks most similar to `query_embedding`
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError>;

    /// Number of chunks in the index
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensions, if known
    fn dimensions(&self) -> Option<usize>;

    /// Embedding model recorded when the index was built, if known
    fn embedding_model(&self) -> Option<&str>;

    fn stats(&self) -> IndexStats {
        IndexStats {
            name: self.name().to_string(),
            chunk_count: self.len(),
            dimensions: self.dimensions(),
            embedding_model: self.embedding_model().map(str::to_string),
        }
    }
}
