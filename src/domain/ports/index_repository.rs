use crate::domain::{errors::DomainError, VectorIndex};
use async_trait::async_trait;

/// Persistent home of the prebuilt [`VectorIndex`].
#[async_trait]
pub trait IndexRepository: Send + Sync {
    async fn load(&self) -> Result<VectorIndex, DomainError>;
    async fn save(&self, index: &VectorIndex) -> Result<(), DomainError>;
}
