use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::{attribute_to, HttpClientTrait};
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The Messages API requires `max_tokens`; used when the request sets none
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let (system, messages) = split_system_messages(&request.messages);

        let anthropic_messages: Vec<AnthropicMessage> =
            messages.into_iter().map(AnthropicMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": anthropic_messages,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        if let Some(system_content) = system {
            body["system"] = serde_json::json!(system_content);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("x-api-key".to_string(), self.api_key.clone()),
            ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: AnthropicResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("anthropic", format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let mut llm_response =
            LlmResponse::new(response.id, response.model, Message::assistant(content));

        if let Some(reason) = response.stop_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.input_tokens, usage.output_tokens));
        }

        Ok(llm_response)
    }
}

/// System messages go in the top-level `system` field, not the message list
fn split_system_messages(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let (system, other): (Vec<&Message>, Vec<&Message>) =
        messages.iter().partition(|m| m.role == MessageRole::System);

    let system = if system.is_empty() {
        None
    } else {
        Some(
            system
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    };

    (system, other)
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.messages_url();
        let body = self.build_request(model, &request);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| attribute_to("anthropic", e))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> AnthropicMessage<'a> {
    fn from_domain(message: &'a Message) -> Self {
        let role = match message.role {
            MessageRole::Assistant => "assistant",
            MessageRole::User | MessageRole::System => "user",
        };

        Self {
            role,
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http() -> HttpClient {
        HttpClient::with_timeout(Duration::from_secs(5)).unwrap()
    }

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn message_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-haiku-20240307",
            "content": [{ "type": "text", "text": text }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 12, "output_tokens": 6 }
        })
    }

    #[tokio::test]
    async fn test_anthropic_chat() {
        let client = MockHttpClient::new().with_response(TEST_URL, message_response("Hello!"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let response = provider
            .chat("claude-3-haiku-20240307", LlmRequest::user("Hi"))
            .await
            .unwrap();

        assert_eq!(response.id, "msg_123");
        assert_eq!(response.content(), "Hello!");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().prompt_tokens, 12);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = MockHttpClient::new().with_response(TEST_URL, message_response("ok"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let request = LlmRequest::user("Hi")
            .with_system("Be brief.")
            .with_temperature(0.7);
        provider.chat("claude-3-haiku-20240307", request).await.unwrap();

        let sent = &provider.client.requests()[0];
        assert_eq!(sent.body["system"], "Be brief.");
        assert_eq!(sent.body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(sent.body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(sent.body["messages"][0]["role"], "user");
        assert_eq!(MockHttpClient::header(sent, "x-api-key"), Some("sk-ant-test"));
        assert_eq!(MockHttpClient::header(sent, "anthropic-version"), Some(ANTHROPIC_VERSION));
    }

    #[tokio::test]
    async fn test_error_is_attributed_to_anthropic() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 401: invalid x-api-key");
        let provider = AnthropicProvider::new(client, "sk-ant-bad");

        let err = provider
            .chat("claude-3-haiku-20240307", LlmRequest::user("Hi"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Provider error: anthropic - HTTP 401: invalid x-api-key");
    }

    #[tokio::test]
    async fn test_wire_format_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-abc"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-3-haiku-20240307",
                "messages": [{"role": "user", "content": "What is a chatbot?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_response("A program.")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url(http(), "sk-ant-abc", server.uri());

        let response = provider
            .chat(
                "claude-3-haiku-20240307",
                LlmRequest::user("What is a chatbot?"),
            )
            .await
            .unwrap();

        assert_eq!(response.content(), "A program.");
    }

    #[tokio::test]
    async fn test_rate_limit_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "type": "error",
                "error": { "type": "rate_limit_error", "message": "Number of requests has exceeded your rate limit" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url(http(), "sk-ant-abc", server.uri());

        let err = provider
            .chat("claude-3-haiku-20240307", LlmRequest::user("Hi"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Provider error: anthropic"));
        assert!(message.contains("rate limit"));
    }
}
