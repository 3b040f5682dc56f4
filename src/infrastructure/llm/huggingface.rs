use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::http;

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// Text-generation endpoint of the Hugging Face inference API.
pub struct HuggingFaceLlm {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_new_tokens: u32,
    token_env: String,
}

impl HuggingFaceLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: model.into(),
            temperature: 0.5,
            max_new_tokens: 512,
            token_env: "HF_TOKEN".to_string(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.model)
            .with_endpoint(&config.endpoint)
            .with_temperature(config.temperature)
            .with_max_new_tokens(config.max_new_tokens)
            .with_token_env(&config.token_env)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.token_env = token_env.into();
        self
    }

    fn url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl LlmService for HuggingFaceLlm {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let token = http::token_from_env(&self.token_env).ok_or_else(|| {
            DomainError::unauthorized(format!("{} is not set", self.token_env))
        })?;

        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                temperature: self.temperature,
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
        };

        let request = self.client.post(self.url()).bearer_auth(token).json(&body);
        let generations: Vec<Generation> = http::send(request)
            .await?
            .json()
            .await
            .map_err(http::map_transport_error)?;

        generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| DomainError::external("text generation returned no output"))
    }
}
