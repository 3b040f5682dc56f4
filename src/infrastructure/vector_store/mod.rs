mod in_memory;
mod persisted;

pub use in_memory::InMemoryVectorStore;
pub use persisted::JsonIndexRepository;
