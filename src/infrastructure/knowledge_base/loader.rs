//! Loads a persisted index directory into memory.
//!
//! Directory layout:
//! - `manifest.json`: `{ "name"?, "embedding_model", "dimensions" }`
//! - `chunks.jsonl`: one chunk per line with `id`, `text`, `embedding`, `metadata`

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::InMemoryVectorIndex;
use crate::domain::knowledge_base::{DocumentChunk, IndexManifest, VectorIndex};
use crate::domain::DomainError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CHUNKS_FILE: &str = "chunks.jsonl";

/// Reads index directories. Every failure maps to `IndexUnavailable`.
#[derive(Debug, Clone)]
pub struct IndexLoader {
    path: PathBuf,
}

impl IndexLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index, rejecting missing, corrupt, empty or mixed-dimension data
    pub async fn load(&self) -> Result<InMemoryVectorIndex, DomainError> {
        if !fs::metadata(&self.path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(DomainError::index_unavailable(format!(
                "Index directory not found: {}",
                self.path.display()
            )));
        }

        let manifest = self.read_manifest().await?;
        let chunks = self.read_chunks().await?;

        if chunks.is_empty() {
            return Err(DomainError::index_unavailable(format!(
                "Index at {} contains no chunks",
                self.path.display()
            )));
        }

        let default_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string());

        let index = InMemoryVectorIndex::with_manifest(manifest, chunks, &default_name)?;

        info!(
            path = %self.path.display(),
            chunks = index.len(),
            "Vector index loaded"
        );

        Ok(index)
    }

    async fn read_manifest(&self) -> Result<IndexManifest, DomainError> {
        let path = self.path.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&path).await.map_err(|e| {
            DomainError::index_unavailable(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let manifest: IndexManifest = serde_json::from_str(&raw).map_err(|e| {
            DomainError::index_unavailable(format!("Corrupt {}: {}", path.display(), e))
        })?;

        debug!(
            embedding_model = %manifest.embedding_model,
            dimensions = manifest.dimensions,
            "Index manifest read"
        );

        Ok(manifest)
    }

    async fn read_chunks(&self) -> Result<Vec<DocumentChunk>, DomainError> {
        let path = self.path.join(CHUNKS_FILE);
        let file = File::open(&path).await.map_err(|e| {
            DomainError::index_unavailable(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let mut lines = BufReader::new(file).lines();
        let mut chunks = Vec::new();
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line().await.map_err(|e| {
            DomainError::index_unavailable(format!("Cannot read {}: {}", path.display(), e))
        })? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let chunk: DocumentChunk = serde_json::from_str(&line).map_err(|e| {
                DomainError::index_unavailable(format!(
                    "Corrupt chunk at {}:{}: {}",
                    path.display(),
                    line_no,
                    e
                ))
            })?;
            chunks.push(chunk);
        }

        Ok(chunks)
    }
}
