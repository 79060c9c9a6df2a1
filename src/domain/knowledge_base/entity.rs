use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::DocumentChunk;

/// Description of a persisted index, written when the index was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Human readable name, e.g. the course week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Embedding model the chunk vectors were produced with
    pub embedding_model: String,
    /// Vector dimensions of every chunk
    pub dimensions: usize,
}

impl IndexManifest {
    pub fn new(embedding_model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: None,
            embedding_model: embedding_model.into(),
            dimensions,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A chunk returned by a similarity search together with its score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    chunk: Arc<DocumentChunk>,
    /// Cosine similarity, higher is more similar
    score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Arc<DocumentChunk>, score: f32) -> Self {
        Self { chunk, score }
    }

    pub fn chunk(&self) -> &DocumentChunk {
        &self.chunk
    }

    pub fn text(&self) -> &str {
        self.chunk.text()
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Summary statistics for display
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub name: String,
    pub chunk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}
