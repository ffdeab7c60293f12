use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingConfig};

/// Turns product text into fixed-length vectors.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
