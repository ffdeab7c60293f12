use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ProductRepository;
use crate::domain::{DomainError, EmbeddingStatus, ProductFilter};

pub struct EmbeddingStatusUseCase {
    product_repo: Arc<dyn ProductRepository>,
}

impl EmbeddingStatusUseCase {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    pub async fn execute(&self) -> Result<EmbeddingStatus, DomainError> {
        let result = self.collect().await;
        self.product_repo.close().await;
        debug!("MongoDB connection closed.");
        result
    }

    async fn collect(&self) -> Result<EmbeddingStatus, DomainError> {
        let total = self.product_repo.count(ProductFilter::All).await?;
        let embedded = self
            .product_repo
            .count(ProductFilter::WithEmbeddings)
            .await?;
        let missing = self
            .product_repo
            .count(ProductFilter::MissingEmbeddings)
            .await?;

        if missing > 0 {
            info!("{} products have no embeddings yet", missing);
        } else {
            info!("All products have embeddings");
        }

        Ok(EmbeddingStatus::new(total, embedded, missing))
    }
}
