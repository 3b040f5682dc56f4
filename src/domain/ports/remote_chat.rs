use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A hosted chat function that takes the raw user message and returns
/// whatever the remote side produced.
#[async_trait]
pub trait RemoteChatClient: Send + Sync {
    async fn predict(&self, message: &str) -> Result<serde_json::Value, DomainError>;
}
