//! In-memory vector index using cosine similarity

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::embedding::cosine_similarity;
use crate::domain::knowledge_base::{DocumentChunk, IndexManifest, ScoredChunk, VectorIndex};
use crate::domain::DomainError;

/// Read-only index held entirely in memory.
///
/// Chunks keep the order they were loaded in; equal scores keep that order.
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    name: String,
    chunks: Vec<Arc<DocumentChunk>>,
    dimensions: Option<usize>,
    embedding_model: Option<String>,
}

impl InMemoryVectorIndex {
    /// Create an index without a manifest.
    ///
    /// Dimensions are taken from the first chunk. Every chunk must share them.
    pub fn new(name: impl Into<String>, chunks: Vec<DocumentChunk>) -> Result<Self, DomainError> {
        let dimensions = chunks.first().map(DocumentChunk::dimensions);
        let index = Self {
            name: name.into(),
            chunks: chunks.into_iter().map(Arc::new).collect(),
            dimensions,
            embedding_model: None,
        };
        index.check_dimensions()?;

        Ok(index)
    }

    /// Create an index described by a manifest
    pub fn with_manifest(
        manifest: IndexManifest,
        chunks: Vec<DocumentChunk>,
        default_name: &str,
    ) -> Result<Self, DomainError> {
        let index = Self {
            name: manifest.name.unwrap_or_else(|| default_name.to_string()),
            chunks: chunks.into_iter().map(Arc::new).collect(),
            dimensions: Some(manifest.dimensions),
            embedding_model: Some(manifest.embedding_model),
        };
        index.check_dimensions()?;

        Ok(index)
    }

    /// An index with no chunks
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunks: Vec::new(),
            dimensions: None,
            embedding_model: None,
        }
    }

    fn check_dimensions(&self) -> Result<(), DomainError> {
        let Some(expected) = self.dimensions else {
            return Ok(());
        };

        if expected == 0 {
            return Err(DomainError::index_unavailable(format!(
                "Index '{}' declares zero-length embeddings",
                self.name
            )));
        }

        if let Some(bad) = self.chunks.iter().find(|c| c.dimensions() != expected) {
            return Err(DomainError::index_unavailable(format!(
                "Chunk '{}' in index '{}' has {} dimensions, expected {}",
                bad.id(),
                self.name,
                bad.dimensions(),
                expected
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimensions {
            if query_embedding.len() != expected {
                return Err(DomainError::index_unavailable(format!(
                    "Query embedding has {} dimensions but index '{}' holds {}-dimensional vectors",
                    query_embedding.len(),
                    self.name,
                    expected
                )));
            }
        }

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| {
                let score = cosine_similarity(chunk.embedding(), query_embedding);
                ScoredChunk::new(Arc::clone(chunk), score)
            })
            .collect();

        // sort_by is stable: ties stay in file order
        scored.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn embedding_model(&self) -> Option<&str> {
        self.embedding_model.as_deref()
    }
}
