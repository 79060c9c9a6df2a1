//! Indexed document chunks

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A chunk of course material stored with its embedding.
///
/// Chunks are produced when the index is built and are read-only at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: String,
    text: String,
    embedding: Vec<f32>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    metadata: HashMap<String, String>,
}

impl DocumentChunk {
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Source document the chunk was cut from, when recorded
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_chunk() {
        let chunk = DocumentChunk::new("c-1", "Test content", vec![0.1, 0.2, 0.3])
            .with_metadata("source", "week2.pdf")
            .with_metadata("page", "4");

        assert_eq!(chunk.id(), "c-1");
        assert_eq!(chunk.text(), "Test content");
        assert_eq!(chunk.dimensions(), 3);
        assert_eq!(chunk.source(), Some("week2.pdf"));
        assert_eq!(chunk.metadata().get("page"), Some(&"4".to_string()));
    }

    #[test]
    fn test_deserialize_without_metadata() {
        let json = r#"{"id":"c-9","text":"Watson","embedding":[1.0,0.0]}"#;
        let chunk: DocumentChunk = serde_json::from_str(json).unwrap();

        assert!(chunk.metadata().is_empty());
        assert_eq!(chunk.source(), None);
    }
}
