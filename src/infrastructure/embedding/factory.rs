use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use super::{HttpClient, HuggingFaceEmbeddingProvider, OpenAiEmbeddingProvider};
use crate::domain::{DomainError, EmbeddingProvider};

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    OpenAiCompatible,
    HuggingFace,
    Local,
}

/// Resolved embedding settings
#[derive(Debug, Clone)]
pub struct EmbeddingOptions {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Factory for creating the query embedder
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(options: &EmbeddingOptions) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let provider: Arc<dyn EmbeddingProvider> = match options.backend {
            EmbeddingBackend::OpenAiCompatible => {
                let mut provider = OpenAiEmbeddingProvider::new(
                    HttpClient::with_timeout(options.timeout)?,
                    &options.model,
                );
                if let Some(url) = &options.base_url {
                    provider = provider.with_base_url(url);
                }
                if let Some(key) = &options.api_key {
                    provider = provider.with_api_key(key);
                }
                Arc::new(provider)
            }
            EmbeddingBackend::HuggingFace => {
                let mut provider = HuggingFaceEmbeddingProvider::new(
                    HttpClient::with_timeout(options.timeout)?,
                    &options.model,
                );
                if let Some(url) = &options.base_url {
                    provider = provider.with_base_url(url);
                }
                if let Some(key) = &options.api_key {
                    provider = provider.with_api_key(key);
                }
                Arc::new(provider)
            }
            EmbeddingBackend::Local => Self::create_local(&options.model)?,
        };

        info!(
            provider = provider.provider_name(),
            model = provider.model(),
            "Embedding provider created"
        );

        Ok(provider)
    }

    #[cfg(feature = "local-embeddings")]
    fn create_local(model: &str) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        Ok(Arc::new(super::LocalEmbeddingProvider::try_new(model)?))
    }

    #[cfg(not(feature = "local-embeddings"))]
    fn create_local(_model: &str) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        Err(DomainError::configuration(
            "The local embedding backend requires building with the `local-embeddings` feature",
        ))
    }
}
