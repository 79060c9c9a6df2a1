use std::time::Instant;

use tracing::{debug, info, warn};

use super::{PipelineStage, Retriever};
use crate::domain::llm::CompletionClient;
use crate::domain::prompt::{Prompt, PromptAssembler};
use crate::domain::DomainError;

/// Runs one question through retrieval, prompt assembly and completion.
///
/// Stateless between questions: each answer sees only its own retrieval result.
#[derive(Debug, Clone)]
pub struct RagPipeline {
    retriever: Retriever,
    assembler: &'static PromptAssembler,
}

impl RagPipeline {
    pub fn new(retriever: Retriever) -> Self {
        Self {
            retriever,
            assembler: PromptAssembler::course(),
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `question` with `client`, stopping at the first failing stage
    pub async fn answer(
        &self,
        question: &str,
        client: &dyn CompletionClient,
    ) -> Result<String, DomainError> {
        let started = Instant::now();
        let mut stage = PipelineStage::Idle;

        let result = self.run(question, client, &mut stage).await;

        match &result {
            Ok(answer) => {
                transition(&mut stage, PipelineStage::Done);
                info!(
                    provider = client.provider_name(),
                    model = client.model(),
                    answer_chars = answer.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Question answered"
                );
            }
            Err(e) => {
                let failed_at = stage;
                transition(&mut stage, PipelineStage::Failed);
                warn!(
                    stage = %failed_at,
                    provider = client.provider_name(),
                    error = %e,
                    "Question failed"
                );
            }
        }

        result
    }

    /// Build the prompt for `question` without calling a model
    pub async fn prepare(&self, question: &str) -> Result<Prompt, DomainError> {
        let chunks = self.retriever.retrieve_default(question).await?;
        self.assembler.build(&chunks, question.trim())
    }

    async fn run(
        &self,
        question: &str,
        client: &dyn CompletionClient,
        stage: &mut PipelineStage,
    ) -> Result<String, DomainError> {
        transition(stage, PipelineStage::Retrieving);
        let chunks = self.retriever.retrieve_default(question).await?;

        transition(stage, PipelineStage::PromptBuilding);
        let prompt = self.assembler.build(&chunks, question.trim())?;

        transition(stage, PipelineStage::Completing);
        client.complete(&prompt).await
    }
}

fn transition(stage: &mut PipelineStage, next: PipelineStage) {
    debug!(from = %stage, to = %next, "Pipeline stage");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::KeywordEmbeddingProvider;
    use crate::domain::knowledge_base::DocumentChunk;
    use crate::domain::llm::{ChatModel, MockLlmProvider};
    use crate::domain::prompt::OUT_OF_SCOPE_INSTRUCTION;
    use crate::infrastructure::knowledge_base::InMemoryVectorIndex;
    use std::sync::Arc;

    const VOCAB: &[&str] = &["ibm", "watson", "piloted", "anderson", "chatbot"];
    const WATSON_CHUNK: &str = "IBM Watson was piloted at MD Anderson in 2013.";

    fn pipeline_with(texts: &[&str], top_k: usize) -> RagPipeline {
        let embedder = KeywordEmbeddingProvider::new(VOCAB);
        let index = if texts.is_empty() {
            InMemoryVectorIndex::empty("empty")
        } else {
            let chunks = texts
                .iter()
                .enumerate()
                .map(|(i, t)| DocumentChunk::new(format!("c{}", i), *t, embedder.vectorize(t)))
                .collect();
            InMemoryVectorIndex::new("week2", chunks).unwrap()
        };

        RagPipeline::new(Retriever::new(Arc::new(embedder), Arc::new(index)).with_top_k(top_k))
    }

    fn echo_model() -> ChatModel {
        ChatModel::new(Arc::new(MockLlmProvider::echo("echo")), "echo-model")
    }

    #[tokio::test]
    async fn test_answer_contains_retrieved_chunk_and_question() {
        let pipeline = pipeline_with(&[WATSON_CHUNK, "A chatbot is a program."], 1);

        let answer = pipeline
            .answer("When was IBM Watson piloted?", &echo_model())
            .await
            .unwrap();

        assert!(answer.contains(WATSON_CHUNK));
        assert!(answer.contains("When was IBM Watson piloted?"));
        assert!(!answer.contains("A chatbot is a program."));
    }

    #[tokio::test]
    async fn test_empty_index_still_sends_instructions() {
        let pipeline = pipeline_with(&[], 5);

        let answer = pipeline.answer("What is blockchain?", &echo_model()).await.unwrap();

        assert!(answer.contains(OUT_OF_SCOPE_INSTRUCTION));
        assert!(answer.contains("Context:\n\n\nQuestion: What is blockchain?"));
    }

    #[tokio::test]
    async fn test_answer_is_idempotent() {
        let pipeline = pipeline_with(&[WATSON_CHUNK, "A chatbot is a program."], 5);
        let model = echo_model();

        let first = pipeline.answer("Tell me about Watson", &model).await.unwrap();
        let second = pipeline.answer("Tell me about Watson", &model).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_completion() {
        let pipeline = pipeline_with(&[WATSON_CHUNK], 5);
        let provider = Arc::new(MockLlmProvider::echo("echo"));
        let model = ChatModel::new(provider.clone(), "echo-model");

        let err = pipeline.answer("  ", &model).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let pipeline = pipeline_with(&[WATSON_CHUNK], 5);
        let model = ChatModel::new(Arc::new(MockLlmProvider::new("groq").with_error("401")), "m");

        let err = pipeline.answer("Watson?", &model).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_prepare_builds_prompt_only() {
        let pipeline = pipeline_with(&[WATSON_CHUNK], 5);

        let prompt = pipeline.prepare("When was IBM Watson piloted?").await.unwrap();

        assert_eq!(prompt.context_chunks(), 1);
        assert!(prompt.as_str().contains(WATSON_CHUNK));
    }
}
