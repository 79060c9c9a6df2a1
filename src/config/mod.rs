//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CourseConfig, EmbeddingConfig, IndexConfig, LlmConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
