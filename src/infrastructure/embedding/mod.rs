//! Embedding provider implementations

mod factory;
mod hugging_face;
#[cfg(feature = "local-embeddings")]
mod local;
mod openai;

pub use factory::{EmbeddingBackend, EmbeddingOptions, EmbeddingProviderFactory};
pub use hugging_face::HuggingFaceEmbeddingProvider;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
