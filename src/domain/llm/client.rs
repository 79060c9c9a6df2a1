//! Completion client bound to one provider and model

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{LlmProvider, LlmRequest};
use crate::domain::prompt::Prompt;
use crate::domain::DomainError;

/// Sampling temperature used for every course answer
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Turns a finished prompt into answer text
#[async_trait]
pub trait CompletionClient: Send + Sync + Debug {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// A provider paired with the model and sampling settings of one session
#[derive(Debug, Clone)]
pub struct ChatModel {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[async_trait]
impl CompletionClient for ChatModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let request = LlmRequest::new(prompt.to_messages())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.provider.chat(&self.model, request).await?;

        debug!(
            provider = self.provider.provider_name(),
            model = %response.model,
            finish_reason = ?response.finish_reason,
            total_tokens = response.usage.map(|u| u.total_tokens),
            "Completion received"
        );

        if response.is_truncated() {
            warn!(
                provider = self.provider.provider_name(),
                max_tokens = ?self.max_tokens,
                "Answer was cut off by the token limit"
            );
        }

        Ok(response.into_content())
    }

    fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{Message, MockLlmProvider};
    use crate::domain::llm::LlmResponse;
    use crate::domain::prompt::build_prompt;

    #[tokio::test]
    async fn test_complete_makes_exactly_one_call() {
        let provider = Arc::new(MockLlmProvider::new("openai").with_response(LlmResponse::new(
            "id-1".to_string(),
            "gpt-4o-mini".to_string(),
            Message::assistant("It was 2013."),
        )));
        let model = ChatModel::new(provider.clone(), "gpt-4o-mini");
        let prompt = build_prompt(&[], "When?").unwrap();

        let answer = model.complete(&prompt).await.unwrap();

        assert_eq!(answer, "It was 2013.");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(model.provider_name(), "openai");
        assert_eq!(model.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_complete_propagates_provider_error() {
        let provider = Arc::new(MockLlmProvider::new("groq").with_error("rate limited"));
        let model = ChatModel::new(provider.clone(), "llama-3.1-8b-instant");
        let prompt = build_prompt(&[], "Q?").unwrap();

        let err = model.complete(&prompt).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_default_temperature() {
        let model = ChatModel::new(Arc::new(MockLlmProvider::new("openai")), "m");
        assert_eq!(model.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(model.with_temperature(0.2).temperature(), 0.2);
    }
}
