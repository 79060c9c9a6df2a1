use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::http_client::{HttpClient, HttpClientTrait};
use super::{AnthropicProvider, OpenAiProvider};
use crate::domain::llm::DEFAULT_TEMPERATURE;
use crate::domain::{
    ChatModel, CompletionClient, DomainError, LlmProvider, ProviderCredentials, ProviderKind,
};

/// Settings shared by every chat model the factory builds
#[derive(Debug, Clone)]
pub struct LlmClientOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    /// Per-provider base URL overrides
    pub base_urls: HashMap<ProviderKind, String>,
}

impl Default for LlmClientOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: Duration::from_secs(60),
            base_urls: HashMap::new(),
        }
    }
}

/// Factory for creating chat models from session credentials
#[derive(Debug, Clone)]
pub struct LlmProviderFactory {
    http_client: Arc<dyn HttpClientTrait>,
    options: LlmClientOptions,
}

impl LlmProviderFactory {
    pub fn new(options: LlmClientOptions) -> Result<Self, DomainError> {
        let http_client = HttpClient::with_timeout(options.timeout)?;
        Ok(Self::with_http_client(Arc::new(http_client), options))
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClientTrait>, options: LlmClientOptions) -> Self {
        Self {
            http_client,
            options,
        }
    }

    pub fn options(&self) -> &LlmClientOptions {
        &self.options
    }

    /// Create the raw provider for `kind`
    pub fn create_provider(
        &self,
        kind: ProviderKind,
        api_key: &str,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let base_url = self.options.base_urls.get(&kind).map(String::as_str);
        let client = Arc::clone(&self.http_client);

        match kind {
            ProviderKind::Anthropic => {
                let provider = match base_url {
                    Some(url) => AnthropicProvider::with_base_url(client, api_key, url),
                    None => AnthropicProvider::new(client, api_key),
                };
                Ok(Arc::new(provider))
            }
            ProviderKind::OpenAi
            | ProviderKind::Together
            | ProviderKind::Groq
            | ProviderKind::HuggingFace
            | ProviderKind::Perplexity => {
                let provider = OpenAiProvider::for_kind(client, kind, api_key, base_url)?;
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create the chat model for already validated credentials
    pub fn create(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn CompletionClient>, DomainError> {
        let provider = self.create_provider(credentials.provider(), credentials.api_key())?;

        let model = ChatModel::new(provider, credentials.effective_model())
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens);

        info!(
            provider = credentials.provider().as_str(),
            model = credentials.effective_model(),
            "Chat model created"
        );

        Ok(Arc::new(model))
    }

    /// Validate raw user input and create the chat model.
    ///
    /// Nothing is constructed and no request is sent when validation fails.
    pub fn create_from_parts(
        &self,
        provider_name: &str,
        api_key: &str,
        model: Option<String>,
    ) -> Result<(ProviderCredentials, Arc<dyn CompletionClient>), DomainError> {
        let credentials = ProviderCredentials::from_parts(provider_name, api_key, model)?;
        let client = self.create(&credentials)?;

        Ok((credentials, client))
    }
}
