mod ingest;
mod rag;

pub use ingest::IndexBuilder;
pub use rag::{stuff_context, RagService, TOP_K};
