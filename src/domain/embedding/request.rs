//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to embed one or more texts with a named model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    inputs: Vec<String>,
}

impl EmbeddingRequest {
    /// Create a request for a single text
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: vec![text.into()],
        }
    }

    /// Create a request for multiple texts
    #[cfg(test)]
    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            model: model.into(),
            inputs: texts,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn into_inputs(self) -> Vec<String> {
        self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request() {
        let request = EmbeddingRequest::single("all-MiniLM-L6-v2", "hello");

        assert_eq!(request.model(), "all-MiniLM-L6-v2");
        assert_eq!(request.len(), 1);
        assert_eq!(request.inputs(), &["hello".to_string()]);
    }

    #[test]
    fn test_batch_request() {
        let request =
            EmbeddingRequest::batch("all-MiniLM-L6-v2", vec!["a".into(), "b".into()]);

        assert_eq!(request.len(), 2);
        assert!(!request.is_empty());
    }
}
