use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge_base::{ScoredChunk, VectorIndex};
use crate::domain::DomainError;

/// Number of chunks retrieved per question unless configured otherwise
pub const DEFAULT_TOP_K: usize = 5;

/// Embeds a question and looks up its nearest chunks
#[derive(Debug, Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        if let Some(index_model) = index.embedding_model() {
            if !same_model(index_model, embedder.model()) {
                warn!(
                    index_model,
                    embedder_model = embedder.model(),
                    "Embedding model differs from the one the index was built with; results may be poor"
                );
            }
        }

        Self {
            embedder,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Retrieve with the configured `top_k`
    pub async fn retrieve_default(&self, query: &str) -> Result<Vec<ScoredChunk>, DomainError> {
        self.retrieve(query, self.top_k).await
    }

    /// Return at most `k` chunks most similar to `query`, best first
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Question must not be empty"));
        }
        if k == 0 {
            return Err(DomainError::validation("k must be at least 1"));
        }

        let embedding = self.embedder.embed_query(query).await?;
        let chunks = self.index.similarity_search(&embedding, k).await?;

        debug!(
            index = self.index.name(),
            k,
            returned = chunks.len(),
            top_score = chunks.first().map(ScoredChunk::score),
            "Retrieved chunks"
        );

        Ok(chunks)
    }
}

/// Compare model ids ignoring an organisation prefix such as `sentence-transformers/`
fn same_model(a: &str, b: &str) -> bool {
    let short = |m: &str| m.rsplit('/').next().unwrap_or(m).to_ascii_lowercase();
    short(a) == short(b)
}
