use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Index unavailable: {message}")]
    IndexUnavailable { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn index_unavailable(message: impl Into<String>) -> Self {
        Self::IndexUnavailable {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Message safe to show an end user.
    ///
    /// Internal errors are collapsed to a generic sentence; their detail
    /// belongs in the logs only.
    pub fn user_message(&self) -> String {
        match self {
            Self::Internal { .. } => {
                "Something went wrong while answering. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("Unsupported provider 'Foo'");
        assert_eq!(
            error.to_string(),
            "Configuration error: Unsupported provider 'Foo'"
        );
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("groq", "HTTP 429: rate limited");
        assert_eq!(error.to_string(), "Provider error: groq - HTTP 429: rate limited");
    }

    #[test]
    fn test_index_unavailable_error() {
        let error = DomainError::index_unavailable("index at ./missing not found");
        assert_eq!(
            error.to_string(),
            "Index unavailable: index at ./missing not found"
        );
    }

    #[test]
    fn test_user_message_hides_internal_detail() {
        let error = DomainError::internal("task join failed: panicked at src/foo.rs:12");
        assert!(!error.user_message().contains("src/foo.rs"));

        let error = DomainError::validation("Question cannot be empty");
        assert_eq!(error.user_message(), "Validation error: Question cannot be empty");
    }
}
