use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    chunk_content, ports::EmbeddingService, ChunkMetadata, Document, DomainError, VectorIndex,
};

/// Builds a [`VectorIndex`] from raw knowledge-base documents.
pub struct IndexBuilder {
    embedding: Arc<dyn EmbeddingService>,
    chunk_size: usize,
}

impl IndexBuilder {
    pub fn new(embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedding,
            chunk_size: 1000,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn empty_index(&self) -> VectorIndex {
        VectorIndex::new(self.embedding.model(), self.embedding.dimension())
    }

    /// Chunks and embeds one document into `index`, returning the number of
    /// chunks added.
    #[instrument(skip(self, index, content))]
    pub async fn add_document(
        &self,
        index: &mut VectorIndex,
        name: &str,
        content: &str,
    ) -> Result<usize, DomainError> {
        let mut doc = Document::new(name);
        if name.ends_with(".md") {
            doc = doc.with_content_type("text/markdown");
        }
        let chunks = chunk_content(doc.id, content, self.chunk_size);
        if chunks.is_empty() {
            tracing::warn!(
                name,
                content_type = %doc.content_type,
                "document has no text, skipped"
            );
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(DomainError::external(format!(
                "{name}: {} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let added = chunks.len();
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            let chunk = chunk.with_metadata(ChunkMetadata {
                source: Some(name.to_string()),
            });
            index.push(chunk, embedding)?;
        }

        Ok(added)
    }

    /// Builds an index from `(name, content)` pairs. At least one chunk must
    /// come out of the sources.
    pub async fn build<'a, I>(&self, sources: I) -> Result<VectorIndex, DomainError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = self.empty_index();
        for (name, content) in sources {
            let added = self.add_document(&mut index, name, content).await?;
            tracing::info!(name, chunks = added, "document indexed");
        }

        if index.is_empty() {
            return Err(DomainError::validation("no text found to index"));
        }
        Ok(index)
    }
}
