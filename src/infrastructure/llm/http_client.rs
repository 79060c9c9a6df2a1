use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST a JSON body and decode a JSON response.
    ///
    /// Non-2xx statuses become `Provider` errors carrying the upstream message.
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "Request timed out"
            } else {
                "Request failed"
            };
            DomainError::provider("http", format!("{}: {}", reason, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {}: {}", status, upstream_message(&error_body)),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl<T: HttpClientTrait + ?Sized> HttpClientTrait for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        (**self).post_json(url, headers, body).await
    }
}

/// Pull the human readable message out of a provider error body.
///
/// Handles `{"error": {"message": ..}}`, `{"error": ".."}` and `{"message": ..}`;
/// anything else is returned as-is.
pub(crate) fn upstream_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    json.pointer("/error/message")
        .or_else(|| json.get("error").filter(|e| e.is_string()))
        .or_else(|| json.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Attribute a transport error to the provider that made the call
pub(crate) fn attribute_to(provider: &'static str, error: DomainError) -> DomainError {
    match error {
        DomainError::Provider { message, .. } => DomainError::provider(provider, message),
        other => other,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http() -> HttpClient {
        HttpClient::with_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_upstream_message_shapes() {
        assert_eq!(
            upstream_message(r#"{"error":{"message":"Incorrect API key provided"}}"#),
            "Incorrect API key provided"
        );
        assert_eq!(upstream_message(r#"{"error":"Model is loading"}"#), "Model is loading");
        assert_eq!(upstream_message(r#"{"message":"Too many requests"}"#), "Too many requests");
        assert_eq!(upstream_message("Bad Gateway "), "Bad Gateway");
    }

    #[test]
    fn test_attribute_to_relabels_provider_errors_only() {
        let err = attribute_to("groq", DomainError::provider("http", "HTTP 429"));
        assert_eq!(err.to_string(), "Provider error: groq - HTTP 429");

        let other = attribute_to("groq", DomainError::validation("x"));
        assert!(matches!(other, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("x-test", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = http();
        let response = client
            .post_json(
                &format!("{}/echo", server.uri()),
                vec![("x-test".to_string(), "1".to_string())],
                &serde_json::json!({}),
            )
            .await
            .unwrap();

        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_error_status_carries_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": {"message": "Invalid API key"}})),
            )
            .mount(&server)
            .await;

        let err = http()
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_post_json_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = http()
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse response"));
    }
}
