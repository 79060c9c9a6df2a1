use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::llm::DEFAULT_TEMPERATURE;
use crate::domain::pipeline::DEFAULT_TOP_K;
use crate::domain::{CourseInfo, DomainError, ProviderKind};
use crate::infrastructure::embedding::{EmbeddingBackend, EmbeddingOptions};
use crate::infrastructure::llm::LlmClientOptions;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub index: IndexConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub course: CourseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the single-page UI
    pub static_dir: PathBuf,
    /// Sessions untouched for this long are dropped along with their API key
    pub session_idle_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory with `manifest.json` and `chunks.jsonl`
    pub path: PathBuf,
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingBackend,
    pub model: String,
    pub base_url: Option<String>,
    /// Name of the environment variable holding the embedding API key
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_tokens: Option<u32>,
    /// Provider name to base URL, e.g. `openai = "http://localhost:4000/v1"`
    pub base_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub title: String,
    pub subtitle: String,
    pub notice: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("public"),
            session_idle_secs: 1800,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./Week_2_16Sep2025"),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::HuggingFace,
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            base_url: None,
            api_key_env: Some("HUGGINGFACEHUB_API_TOKEN".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
            max_tokens: None,
            base_urls: HashMap::new(),
        }
    }
}

impl Default for CourseConfig {
    fn default() -> Self {
        let info = CourseInfo::default();
        Self {
            title: info.title,
            subtitle: info.subtitle,
            notice: info.notice,
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local` and `APP__SECTION__KEY` variables
    /// over the built-in defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.server.session_idle_secs == 0 {
            return Err(DomainError::configuration(
                "server.session_idle_secs must be at least 1",
            ));
        }

        if self.index.top_k == 0 {
            return Err(DomainError::configuration("index.top_k must be at least 1"));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DomainError::configuration(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }

        if self.embedding.model.trim().is_empty() {
            return Err(DomainError::configuration("embedding.model must not be empty"));
        }

        self.llm.client_options().map(|_| ())
    }
}

impl ServerConfig {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl EmbeddingConfig {
    /// Resolve into factory options, reading the API key from the environment
    pub fn options(&self) -> EmbeddingOptions {
        let api_key = self
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty());

        EmbeddingOptions {
            backend: self.provider,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl LlmConfig {
    pub fn client_options(&self) -> Result<LlmClientOptions, DomainError> {
        let base_urls = self
            .base_urls
            .iter()
            .map(|(name, url)| Ok((name.parse::<ProviderKind>()?, url.clone())))
            .collect::<Result<HashMap<_, _>, DomainError>>()?;

        Ok(LlmClientOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
            base_urls,
        })
    }
}

impl CourseConfig {
    pub fn info(&self) -> CourseInfo {
        CourseInfo {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            notice: self.notice.clone(),
        }
    }
}
