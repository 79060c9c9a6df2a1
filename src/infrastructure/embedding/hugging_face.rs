//! Hugging Face inference `feature-extraction` provider

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;
use crate::infrastructure::llm::attribute_to;

pub const DEFAULT_HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Sentence embeddings from the hosted feature-extraction pipeline
#[derive(Debug)]
pub struct HuggingFaceEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> HuggingFaceEmbeddingProvider<C> {
    /// `model` is the hub id, e.g. `sentence-transformers/all-MiniLM-L6-v2`
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: None,
            base_url: DEFAULT_HF_INFERENCE_URL.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    fn pipeline_url(&self) -> String {
        format!("{}/{}/pipeline/feature-extraction", self.base_url, self.model)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization".to_string(), auth.clone()));
        }
        headers
    }
}

/// The pipeline returns one vector per input, or a bare vector for a single input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionOutput {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for HuggingFaceEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let body = serde_json::json!({
            "inputs": request.inputs(),
            "options": { "wait_for_model": true },
        });

        let json = self
            .client
            .post_json(&self.pipeline_url(), self.headers(), &body)
            .await
            .map_err(|e| attribute_to("hugging_face", e))?;

        let output: FeatureExtractionOutput = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(
                "hugging_face",
                format!("Unexpected feature-extraction output: {}", e),
            )
        })?;

        let vectors = match output {
            FeatureExtractionOutput::Batch(vectors) => vectors,
            FeatureExtractionOutput::Single(vector) => vec![vector],
        };

        if vectors.len() != request.len() {
            return Err(DomainError::provider(
                "hugging_face",
                format!(
                    "Expected {} embeddings, received {}",
                    request.len(),
                    vectors.len()
                ),
            ));
        }

        let embeddings = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| Embedding::new(i, v))
            .collect();

        Ok(EmbeddingResponse::new(self.model.clone(), embeddings))
    }

    fn provider_name(&self) -> &'static str {
        "hugging_face"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
