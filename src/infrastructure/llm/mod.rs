//! LLM provider implementations

mod anthropic;
mod factory;
mod http_client;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::{LlmClientOptions, LlmProviderFactory};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{default_base_url, OpenAiProvider};

pub(crate) use http_client::attribute_to;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
