use serde::Deserialize;
use std::path::Path;

use crate::domain::{DomainError, PromptTemplate};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.yaml");

/// Environment variable naming a YAML file that replaces the built-in config.
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub space: SpaceConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceConfig {
    pub space_id: String,
    pub api_name: String,
    #[serde(default)]
    pub api_prefix: String,
    /// Overrides the `*.hf.space` host derived from `space_id`.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub token_env: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub token_env: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    pub index_path: String,
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    pub assistant: AssistantPrompts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantPrompts {
    pub title: String,
    pub description: String,
    pub template: String,
}

impl AssistantPrompts {
    pub fn template(&self) -> PromptTemplate {
        PromptTemplate::new(self.template.clone(), &["context", "question"])
    }
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::validation(format!("invalid config: {e}")))
    }

    /// The `config/default.yaml` compiled into the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_yaml(DEFAULT_CONFIG)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::not_found(format!("config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Built-in defaults, or the file named by `APP_CONFIG`, followed by
    /// `SERVER_HOST` / `SERVER_PORT` overrides.
    pub fn load() -> Result<Self, DomainError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::builtin()?,
        };

        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.config.server.port = port
                .parse()
                .map_err(|e| DomainError::validation(format!("SERVER_PORT: {e}")))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::builtin().unwrap();

        assert_eq!(config.config.server.host, "0.0.0.0");
        assert_eq!(config.config.server.port, 7860);
        assert_eq!(config.config.space.space_id, "nahidmuntasir7/HealthAssistant");
        assert_eq!(config.config.space.api_name, "/chat");
        assert_eq!(config.config.llm.model, "mistralai/Mistral-7B-Instruct-v0.3");
        assert!((config.config.llm.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.config.llm.max_new_tokens, 512);
        assert_eq!(config.config.llm.token_env, "HF_TOKEN");
        assert_eq!(
            config.config.embedding.model,
            "sentence-transformers/all-MiniLM-L6-v2"
        );
        assert_eq!(config.config.rag.index_path, "vectorstore/index.json");
    }

    #[test]
    fn test_default_template_has_both_slots() {
        let config = AppConfig::builtin().unwrap();
        let template = &config.prompts.assistant.template;

        assert!(template.contains("{context}"));
        assert!(template.contains("{question}"));

        let rendered = config
            .prompts
            .assistant
            .template()
            .render(&[("context", "CTX"), ("question", "QUESTION")])
            .unwrap();
        assert!(rendered.contains("Context: CTX"));
        assert!(rendered.contains("Question: QUESTION"));
    }

    #[test]
    fn test_invalid_yaml_is_validation_error() {
        let err = AppConfig::from_yaml("config: [").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = AppConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
