//! Course RAG assistant
//!
//! Answers student questions about a course from a prebuilt vector index of
//! the course materials:
//! - Query embedding and top-k similarity search over the loaded index
//! - A fixed prompt combining retrieved context with the question
//! - One chat completion from a user-chosen provider (OpenAI, Together, Groq,
//!   Hugging Face, Anthropic, Perplexity)

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{RagPipeline, Retriever, VectorIndex};
use infrastructure::{
    embedding::EmbeddingProviderFactory, knowledge_base::IndexLoader, llm::LlmProviderFactory,
    session::InMemorySessionStore,
};

/// Load the index and embedder and wire them into a pipeline
pub async fn build_pipeline(config: &AppConfig) -> anyhow::Result<RagPipeline> {
    let index = IndexLoader::new(config.index.path.clone()).load().await?;
    let stats = index.stats();
    info!(
        index = %stats.name,
        chunks = stats.chunk_count,
        dimensions = ?stats.dimensions,
        path = %config.index.path.display(),
        "Index loaded"
    );

    let embedder = EmbeddingProviderFactory::create(&config.embedding.options())?;
    let retriever = Retriever::new(embedder, Arc::new(index)).with_top_k(config.index.top_k);

    Ok(RagPipeline::new(retriever))
}

/// Factory for per-session chat models
pub fn create_llm_factory(config: &AppConfig) -> anyhow::Result<LlmProviderFactory> {
    Ok(LlmProviderFactory::new(config.llm.client_options()?)?)
}

/// Create the HTTP application state
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let pipeline = build_pipeline(config).await?;
    let factory = create_llm_factory(config)?;

    Ok(AppState::new(
        config.course.info(),
        pipeline,
        Arc::new(InMemorySessionStore::new(config.server.session_idle_timeout())),
        factory,
    ))
}
