use std::fmt;

use super::ProviderKind;
use crate::domain::DomainError;

/// Credentials a user supplies for one session.
///
/// Held in memory for the session's lifetime only. `Debug` never prints the key.
#[derive(Clone)]
pub struct ProviderCredentials {
    provider: ProviderKind,
    api_key: String,
    model: Option<String>,
}

impl ProviderCredentials {
    /// Build and validate credentials.
    ///
    /// Fails with a configuration error when the key is empty or lacks the
    /// provider's required prefix. A blank model override means "use the default".
    pub fn new(
        provider: ProviderKind,
        api_key: impl Into<String>,
        model: Option<String>,
    ) -> Result<Self, DomainError> {
        let api_key = api_key.into().trim().to_string();
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let credentials = Self {
            provider,
            api_key,
            model,
        };
        credentials.validate()?;

        Ok(credentials)
    }

    /// Parse the provider by name, then build and validate
    pub fn from_parts(
        provider_name: &str,
        api_key: impl Into<String>,
        model: Option<String>,
    ) -> Result<Self, DomainError> {
        let provider = provider_name.parse::<ProviderKind>()?;
        Self::new(provider, api_key, model)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.api_key.is_empty() {
            return Err(DomainError::configuration(format!(
                "An API key is required for {}",
                self.provider
            )));
        }

        if let Some(prefix) = self.provider.required_key_prefix() {
            if !self.api_key.starts_with(prefix) {
                return Err(DomainError::configuration(format!(
                    "Invalid API key format for {}: expected a key starting with '{}'",
                    self.provider, prefix
                )));
            }
        }

        Ok(())
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The explicit model override, if any
    #[cfg(test)]
    pub fn model_override(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Model to call: the override, else the provider default
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}
