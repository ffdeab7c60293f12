use std::sync::Arc;

use tracing::info;

use crate::application::ProductRepository;
use crate::domain::DomainError;

/// Strips the embedding field from every product.
pub struct DeleteEmbeddingsUseCase {
    product_repo: Arc<dyn ProductRepository>,
}

impl DeleteEmbeddingsUseCase {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    /// Returns the number of documents that lost their embeddings.
    pub async fn execute(&self) -> Result<u64, DomainError> {
        let result = self.product_repo.unset_all_embeddings().await;

        if let Ok(modified) = &result {
            info!("Embeddings deleted successfully from {} products", modified);
        }

        self.product_repo.close().await;
        info!("MongoDB connection closed.");

        result
    }
}
