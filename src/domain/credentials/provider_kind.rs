use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The closed set of completion providers a session can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Together,
    Groq,
    HuggingFace,
    Anthropic,
    Perplexity,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::OpenAi,
        ProviderKind::Together,
        ProviderKind::Groq,
        ProviderKind::HuggingFace,
        ProviderKind::Anthropic,
        ProviderKind::Perplexity,
    ];

    /// Name shown in the provider picker
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Together => "Together",
            ProviderKind::Groq => "Groq",
            ProviderKind::HuggingFace => "Hugging Face",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Perplexity => "Perplexity",
        }
    }

    /// Model used when the session does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Together => "mistralai/Mistral-7B-Instruct-v0.2",
            ProviderKind::Groq => "llama-3.1-8b-instant",
            ProviderKind::HuggingFace => "HuggingFaceH4/zephyr-7b-beta",
            ProviderKind::Anthropic => "claude-3-haiku-20240307",
            ProviderKind::Perplexity => "sonar-pro",
        }
    }

    /// Literal prefix the API key must start with, for providers that have one
    pub fn required_key_prefix(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("sk-"),
            ProviderKind::Anthropic => Some("sk-ant-"),
            ProviderKind::Perplexity => Some("pplx-"),
            ProviderKind::Together | ProviderKind::Groq | ProviderKind::HuggingFace => None,
        }
    }

    /// Conventional environment variable holding this provider's key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Together => "TOGETHER_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::HuggingFace => "HUGGINGFACEHUB_API_TOKEN",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Perplexity => "PPLX_API_KEY",
        }
    }

    /// Stable lowercase identifier used in logs and config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Together => "together",
            ProviderKind::Groq => "groq",
            ProviderKind::HuggingFace => "hugging_face",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Perplexity => "perplexity",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    /// Accepts display names and the lowercase identifiers, ignoring case,
    /// spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "together" | "togetherai" => Ok(ProviderKind::Together),
            "groq" => Ok(ProviderKind::Groq),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "perplexity" | "pplx" => Ok(ProviderKind::Perplexity),
            _ => Err(DomainError::configuration(format!(
                "Unsupported provider '{}'",
                s.trim()
            ))),
        }
    }
}
