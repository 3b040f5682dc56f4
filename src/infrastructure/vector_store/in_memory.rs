use async_trait::async_trait;

use crate::domain::{
    ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult, VectorIndex,
};

/// Brute-force cosine search over a loaded [`VectorIndex`].
pub struct InMemoryVectorStore {
    dimension: usize,
    chunks: Vec<(DocumentChunk, Embedding)>,
}

impl From<VectorIndex> for InMemoryVectorStore {
    fn from(index: VectorIndex) -> Self {
        Self {
            dimension: index.dimension,
            chunks: index
                .entries
                .into_iter()
                .map(|e| (e.chunk, e.embedding))
                .collect(),
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if query.dimension() != self.dimension {
            return Err(DomainError::validation(format!(
                "query embedding has dimension {} but the index stores {}",
                query.dimension(),
                self.dimension
            )));
        }

        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}
