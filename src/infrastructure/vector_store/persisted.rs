use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::domain::{ports::IndexRepository, DomainError, VectorIndex};

/// A [`VectorIndex`] stored as a single JSON file.
pub struct JsonIndexRepository {
    path: PathBuf,
}

impl JsonIndexRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IndexRepository for JsonIndexRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<VectorIndex, DomainError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DomainError::not_found(format!("vector index {}", self.path.display()))
            }
            _ => DomainError::internal(format!("reading {}: {e}", self.path.display())),
        })?;

        let index: VectorIndex = serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::validation(format!("corrupt vector index: {e}")))?;
        index.validate()?;

        tracing::debug!(entries = index.len(), model = %index.embedding_model, "index loaded");
        Ok(index)
    }

    #[instrument(skip(self, index), fields(path = %self.path.display(), entries = index.len()))]
    async fn save(&self, index: &VectorIndex) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::internal(format!("creating {}: {e}", parent.display())))?;
        }

        let json = serde_json::to_vec(index).map_err(|e| DomainError::internal(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| DomainError::internal(format!("writing {}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, Embedding};
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("health-assistant-{}", Uuid::new_v4()))
            .join(name)
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = JsonIndexRepository::new(temp_path("index.json"));
        let mut index = VectorIndex::new("mini", 2);
        index
            .push(
                DocumentChunk::new(Uuid::new_v4(), "rest well", 0),
                Embedding::new(vec![0.5, 0.5]),
            )
            .unwrap();

        repo.save(&index).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded.embedding_model, "mini");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries[0].chunk.content, "rest well");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let repo = JsonIndexRepository::new(temp_path("absent.json"));
        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_garbage_is_validation_error() {
        let path = temp_path("garbage.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"\x00not json").await.unwrap();

        let err = JsonIndexRepository::new(path).load().await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
