//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (sentence-transformer endpoints, local ONNX models, etc.)
///
/// The model is fixed when the provider is built and must be the one the
/// vector index was built with.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model this provider embeds with
    fn model(&self) -> &str;

    /// Embed a single text and return its vector
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(self.model(), text);
        let response = self.embed(request).await?;

        response
            .into_first()
            .map(|e| e.into_vector())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                DomainError::provider(self.provider_name(), "Embedding response contained no vector")
            })
    }
}
