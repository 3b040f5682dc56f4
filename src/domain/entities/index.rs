use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DocumentChunk, DomainError, Embedding};

pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Prebuilt knowledge base: chunk texts paired with their embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub version: u32,
    pub embedding_model: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: DocumentChunk,
    pub embedding: Embedding,
}

impl VectorIndex {
    pub fn new(embedding_model: impl Into<String>, dimension: usize) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            embedding_model: embedding_model.into(),
            dimension,
            created_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: DocumentChunk, embedding: Embedding) -> Result<(), DomainError> {
        if embedding.dimension() != self.dimension {
            return Err(DomainError::validation(format!(
                "embedding for chunk {} has {} dimensions, index expects {}",
                chunk.id,
                embedding.dimension(),
                self.dimension
            )));
        }
        self.entries.push(IndexEntry { chunk, embedding });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the format version and that every entry matches `dimension`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version != INDEX_FORMAT_VERSION {
            return Err(DomainError::validation(format!(
                "unsupported index version {}",
                self.version
            )));
        }

        match self
            .entries
            .iter()
            .find(|e| e.embedding.dimension() != self.dimension)
        {
            Some(bad) => Err(DomainError::validation(format!(
                "chunk {} has {} dimensions, index expects {}",
                bad.chunk.id,
                bad.embedding.dimension(),
                self.dimension
            ))),
            None => Ok(()),
        }
    }
}
