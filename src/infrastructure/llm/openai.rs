use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::{attribute_to, HttpClientTrait};
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, ProviderKind, Usage,
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Base URL (up to and excluding `/chat/completions`) for providers that
/// speak the OpenAI chat completions wire format
pub fn default_base_url(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::OpenAi => Some(DEFAULT_OPENAI_BASE_URL),
        ProviderKind::Together => Some("https://api.together.xyz/v1"),
        ProviderKind::Groq => Some("https://api.groq.com/openai/v1"),
        ProviderKind::HuggingFace => Some("https://router.huggingface.co/v1"),
        ProviderKind::Perplexity => Some("https://api.perplexity.ai"),
        ProviderKind::Anthropic => None,
    }
}

/// Chat completions provider for OpenAI and the OpenAI-compatible APIs
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    name: &'static str,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    #[cfg(test)]
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            name: ProviderKind::OpenAi.as_str(),
            auth_header,
            base_url,
        }
    }

    /// Provider for `kind` at its public endpoint, or at `base_url` when given
    pub fn for_kind(
        client: C,
        kind: ProviderKind,
        api_key: impl Into<String>,
        base_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        let base_url = base_url.or_else(|| default_base_url(kind)).ok_or_else(|| {
            DomainError::configuration(format!(
                "{} does not use the chat completions API",
                kind
            ))
        })?;

        let mut provider = Self::with_base_url(client, api_key, base_url);
        provider.name = kind.as_str();
        Ok(provider)
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), self.auth_header.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    fn parse_response(
        &self,
        model: &str,
        json: serde_json::Value,
    ) -> Result<LlmResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(self.name, format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(self.name, "No choices in response"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| DomainError::provider(self.name, "Response message has no content"))?;

        let mut llm_response = LlmResponse::new(
            response.id.unwrap_or_default(),
            response.model.unwrap_or_else(|| model.to_string()),
            Message::assistant(content),
        );

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response = llm_response.with_usage(Usage::new(
                usage.prompt_tokens,
                usage.completion_tokens,
            ));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| attribute_to(self.name, e))?;

        self.parse_response(model, response)
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> OpenAiMessage<'a> {
    fn from_domain(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::HttpClient;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http() -> HttpClient {
        HttpClient::with_timeout(Duration::from_secs(5)).unwrap()
    }

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18 }
        })
    }

    #[tokio::test]
    async fn test_openai_chat() {
        let client = MockHttpClient::new().with_response(TEST_URL, completion("MD Anderson, 2013."));
        let provider = OpenAiProvider::new(client, "sk-test");

        let request = LlmRequest::user("When?").with_temperature(0.7);
        let response = provider.chat("gpt-4o-mini", request).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.content(), "MD Anderson, 2013.");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 18);
    }

    #[tokio::test]
    async fn test_request_body_and_headers() {
        let client = MockHttpClient::new().with_response(TEST_URL, completion("ok"));
        let provider = OpenAiProvider::new(client, "sk-test");

        let request = LlmRequest::user("Hi").with_temperature(0.7);
        provider.chat("gpt-4o-mini", request).await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.body["model"], "gpt-4o-mini");
        assert_eq!(sent.body["stream"], false);
        assert_eq!(sent.body["messages"][0]["role"], "user");
        assert_eq!(sent.body["messages"][0]["content"], "Hi");
        assert!((sent.body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(MockHttpClient::header(sent, "authorization"), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_error_is_attributed_to_provider() {
        let url = "https://api.groq.com/openai/v1/chat/completions";
        let client = MockHttpClient::new().with_error(url, "HTTP 401: Invalid API Key");
        let provider =
            OpenAiProvider::for_kind(client, ProviderKind::Groq, "gsk_bad", None).unwrap();

        let err = provider
            .chat("llama-3.1-8b-instant", LlmRequest::user("Hi"))
            .await
            .unwrap_err();

        match err {
            DomainError::Provider { provider, message } => {
                assert_eq!(provider, "groq");
                assert!(message.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_provider_error() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({"id": "x", "choices": []}));
        let provider = OpenAiProvider::new(client, "sk-test");

        let err = provider
            .chat("gpt-4o-mini", LlmRequest::user("Hi"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No choices"));
    }

    #[test]
    fn test_kind_endpoints() {
        let url = |kind| {
            OpenAiProvider::for_kind(MockHttpClient::new(), kind, "k", None)
                .unwrap()
                .chat_completions_url()
        };

        assert_eq!(url(ProviderKind::OpenAi), TEST_URL);
        assert_eq!(url(ProviderKind::Together), "https://api.together.xyz/v1/chat/completions");
        assert_eq!(url(ProviderKind::HuggingFace), "https://router.huggingface.co/v1/chat/completions");
        assert_eq!(url(ProviderKind::Perplexity), "https://api.perplexity.ai/chat/completions");
        assert!(OpenAiProvider::for_kind(MockHttpClient::new(), ProviderKind::Anthropic, "k", None).is_err());
    }

    #[tokio::test]
    async fn test_wire_format_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("pplx-abc"))
            .and(body_partial_json(serde_json::json!({
                "model": "sonar-pro",
                "messages": [{"role": "user", "content": "What is NLP?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Natural language processing.")))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/v1", server.uri());
        let provider =
            OpenAiProvider::for_kind(http(), ProviderKind::Perplexity, "pplx-abc", Some(&base))
                .unwrap();

        let response = provider
            .chat("sonar-pro", LlmRequest::user("What is NLP?"))
            .await
            .unwrap();

        assert_eq!(response.content(), "Natural language processing.");
        assert_eq!(provider.provider_name(), "perplexity");
    }
}
