//! Domain layer - Core business logic and entities

pub mod course;
pub mod credentials;
pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod session;

pub use course::{CourseInfo, SampleQuestion, SAMPLE_QUESTIONS};
pub use credentials::{ProviderCredentials, ProviderKind};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use knowledge_base::{DocumentChunk, IndexManifest, IndexStats, ScoredChunk, VectorIndex};
pub use llm::{
    ChatModel, CompletionClient, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message,
    MessageRole, Usage,
};
pub use pipeline::{PipelineStage, RagPipeline, Retriever};
pub use prompt::{build_prompt, Prompt, PromptAssembler, PromptTemplate, TemplateError};
pub use session::{
    SessionContext, SessionId, SessionStore, SharedSession, Transcript, TranscriptEntry,
};
