mod conversation;
mod document;
mod embedding;
mod index;
mod prompt;

pub use conversation::{Message, MessageRole};
pub use document::{chunk_content, ChunkMetadata, Document, DocumentChunk, SearchResult};
pub use embedding::Embedding;
pub use index::{IndexEntry, VectorIndex, INDEX_FORMAT_VERSION};
pub use prompt::PromptTemplate;
