use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, SearchResult,
};

/// Number of passages handed to the prompt.
pub const TOP_K: usize = 3;

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl RagService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding,
            vector_store,
        }
    }

    /// Embeds `query` and returns the [`TOP_K`] closest passages.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(&embedding, TOP_K).await
    }
}

/// Concatenates passage texts separated by a blank line.
pub fn stuff_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, Embedding};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FixedEmbedding;

    #[async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            Ok(texts.iter().map(|_| Embedding::new(vec![1.0, 0.0])).collect())
        }

        fn model(&self) -> &str {
            "fixed"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        requested: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn search(
            &self,
            _query: &Embedding,
            top_k: usize,
        ) -> Result<Vec<SearchResult>, DomainError> {
            self.requested.lock().unwrap().push(top_k);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_retrieve_always_asks_for_three() {
        let store = Arc::new(RecordingStore::default());
        let rag = RagService::new(Arc::new(FixedEmbedding), store.clone());

        let long_question = "why ".repeat(500);
        for query in ["hello", "", long_question.as_str()] {
            rag.retrieve(query).await.unwrap();
        }

        assert_eq!(*store.requested.lock().unwrap(), vec![3, 3, 3]);
    }

    #[test]
    fn test_stuff_context_joins_passages() {
        let doc_id = Uuid::new_v4();
        let results: Vec<SearchResult> = ["one", "two"]
            .iter()
            .enumerate()
            .map(|(i, text)| SearchResult {
                chunk: DocumentChunk::new(doc_id, *text, i),
                score: 1.0,
            })
            .collect();

        assert_eq!(stuff_context(&results), "one\n\ntwo");
        assert_eq!(stuff_context(&[]), "");
    }
}
