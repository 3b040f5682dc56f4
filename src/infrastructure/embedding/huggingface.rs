use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;
use crate::infrastructure::http;

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [&'a str],
}

/// Sentence embeddings from the Hugging Face feature-extraction pipeline.
pub struct HuggingFaceEmbedding {
    client: Client,
    endpoint: String,
    model: String,
    dimension: usize,
    token_env: String,
}

impl HuggingFaceEmbedding {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            token_env: "HF_TOKEN".to_string(),
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new()
            .with_model(&config.model)
            .with_dimension(config.dimension)
            .with_endpoint(&config.endpoint)
            .with_token_env(&config.token_env)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.token_env = token_env.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/{}/pipeline/feature-extraction",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for HuggingFaceEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for HuggingFaceEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("No embedding returned"))
    }

    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .client
            .post(self.url())
            .json(&FeatureExtractionRequest { inputs: texts });
        if let Some(token) = http::token_from_env(&self.token_env) {
            request = request.bearer_auth(token);
        }

        let vectors: Vec<Vec<f32>> = http::send(request)
            .await?
            .json()
            .await
            .map_err(http::map_transport_error)?;

        if vectors.len() != texts.len() {
            return Err(DomainError::external(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
