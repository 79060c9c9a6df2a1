//! LLM provider domain models and traits

mod client;
mod message;
mod provider;
mod request;
mod response;

pub use client::{ChatModel, CompletionClient, DEFAULT_TEMPERATURE};
pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::LlmRequest;
pub use response::{FinishReason, LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
