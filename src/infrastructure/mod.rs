pub mod assistant;
pub mod config;
pub mod embedding;
pub mod http;
pub mod knowledge_base;
pub mod llm;
pub mod remote;
pub mod telemetry;
pub mod terminal;
pub mod vector_store;

pub use assistant::RetrievalAssistant;
pub use config::{AppConfig, Config, PromptsConfig};
pub use embedding::HuggingFaceEmbedding;
pub use llm::HuggingFaceLlm;
pub use remote::GradioSpaceClient;
pub use vector_store::{InMemoryVectorStore, JsonIndexRepository};
