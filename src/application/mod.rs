//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! adapters.

pub mod services;

pub use services::{stuff_context, IndexBuilder, RagService, TOP_K};
