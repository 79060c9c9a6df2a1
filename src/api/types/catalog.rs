//! Read-only catalog bodies: course banner, providers, sample questions

use serde::Serialize;

use crate::domain::{IndexStats, ProviderKind, SampleQuestion};

#[derive(Debug, Clone, Serialize)]
pub struct CourseInfoResponse {
    pub title: String,
    pub subtitle: String,
    pub notice: String,
    /// Shown when a question is asked before credentials are entered
    pub missing_credentials_message: &'static str,
    pub top_k: usize,
    pub index: IndexStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub default_model: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<&'static str>,
    pub api_key_env: &'static str,
}

impl From<ProviderKind> for ProviderInfo {
    fn from(kind: ProviderKind) -> Self {
        Self {
            id: kind.as_str(),
            name: kind.display_name(),
            default_model: kind.default_model(),
            key_prefix: kind.required_key_prefix(),
            api_key_env: kind.api_key_env_var(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleQuestionInfo {
    pub number: usize,
    #[serde(flatten)]
    pub sample: SampleQuestion,
    /// Shown when this question is picked before a session exists
    pub pending_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleQuestionsResponse {
    pub questions: Vec<SampleQuestionInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_info_omits_missing_prefix() {
        let groq = serde_json::to_value(ProviderInfo::from(ProviderKind::Groq)).unwrap();
        let openai = serde_json::to_value(ProviderInfo::from(ProviderKind::OpenAi)).unwrap();

        assert!(groq.get("key_prefix").is_none());
        assert_eq!(openai["key_prefix"], "sk-");
        assert_eq!(openai["name"], "OpenAI");
    }
}
