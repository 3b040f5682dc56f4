mod embedding;
mod index_repository;
mod llm;
mod remote_chat;
mod vector_store;

pub use embedding::EmbeddingService;
pub use index_repository::IndexRepository;
pub use llm::LlmService;
pub use remote_chat::RemoteChatClient;
pub use vector_store::VectorStore;
