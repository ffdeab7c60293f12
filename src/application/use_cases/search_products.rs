use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{EmbeddingService, ProductRepository};
use crate::domain::{DomainError, ProductMatch, ProductSearchQuery};

/// Finds products whose stored embeddings are closest to a free-text query.
pub struct SearchProductsUseCase {
    product_repo: Arc<dyn ProductRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl SearchProductsUseCase {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            product_repo,
            embedding_service,
        }
    }

    pub async fn execute(&self, query: ProductSearchQuery) -> Result<Vec<ProductMatch>, DomainError> {
        let result = self.search(&query).await;
        self.product_repo.close().await;
        debug!("MongoDB connection closed.");
        result
    }

    async fn search(&self, query: &ProductSearchQuery) -> Result<Vec<ProductMatch>, DomainError> {
        if query.query().trim().is_empty() {
            return Err(DomainError::invalid_input("Search query must not be empty"));
        }

        info!("Searching products for: {}", query.query());
        let start_time = Instant::now();

        let query_embedding = self.embedding_service.embed_text(query.query()).await?;
        let matches = self
            .product_repo
            .vector_search(&query_embedding, query)
            .await?;

        info!(
            "Found {} products in {:.2?}",
            matches.len(),
            start_time.elapsed()
        );

        Ok(matches)
    }
}
