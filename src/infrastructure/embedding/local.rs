//! In-process sentence embeddings via `fastembed` (ONNX runtime)

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Runs the embedding model locally; no network after the first download
pub struct LocalEmbeddingProvider {
    model: String,
    inner: Arc<Mutex<TextEmbedding>>,
}

impl std::fmt::Debug for LocalEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbeddingProvider")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LocalEmbeddingProvider {
    /// Load `model` (e.g. `all-MiniLM-L6-v2`), downloading it on first use
    pub fn try_new(model: &str) -> Result<Self, DomainError> {
        let embedding_model = resolve_model(model)?;
        let inner = TextEmbedding::try_new(
            InitOptions::new(embedding_model).with_show_download_progress(false),
        )
        .map_err(|e| DomainError::configuration(format!("Failed to load {}: {}", model, e)))?;

        info!(model, "Local embedding model loaded");

        Ok(Self {
            model: model.to_string(),
            inner: Arc::new(Mutex::new(inner)),
        })
    }
}

fn resolve_model(model: &str) -> Result<EmbeddingModel, DomainError> {
    let short = model.rsplit('/').next().unwrap_or(model).to_ascii_lowercase();
    match short.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        _ => Err(DomainError::configuration(format!(
            "Local embedding model '{}' is not supported",
            model
        ))),
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let inner = Arc::clone(&self.inner);
        let texts = request.into_inputs();

        let vectors = tokio::task::spawn_blocking(move || {
            let model = inner
                .lock()
                .map_err(|_| DomainError::internal("Local embedding model lock poisoned"))?;
            model
                .embed(texts, None)
                .map_err(|e| DomainError::provider("local", e.to_string()))
        })
        .await
        .map_err(|e| DomainError::internal(format!("Embedding task failed: {}", e)))??;

        let embeddings = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| Embedding::new(i, v))
            .collect();

        Ok(EmbeddingResponse::new(self.model.clone(), embeddings))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model_accepts_hub_ids() {
        assert!(matches!(
            resolve_model("sentence-transformers/all-MiniLM-L6-v2"),
            Ok(EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(resolve_model("text-embedding-3-small").is_err());
    }
}
