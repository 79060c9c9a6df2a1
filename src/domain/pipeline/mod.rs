//! Question answering pipeline: retrieve, assemble, complete

mod orchestrator;
mod retriever;
mod stage;

pub use orchestrator::RagPipeline;
pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use stage::PipelineStage;
