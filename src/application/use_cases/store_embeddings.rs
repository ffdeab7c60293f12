use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::application::{EmbeddingService, ProductRepository};
use crate::domain::{DomainError, ProductFilter, SyncReport};

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Only visit documents that have no embedding yet.
    pub only_missing: bool,
}

/// Computes an embedding for every product description and writes it back
/// onto the document.
///
/// The repository is closed when `execute` returns, whatever the outcome.
pub struct StoreEmbeddingsUseCase {
    product_repo: Arc<dyn ProductRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl StoreEmbeddingsUseCase {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            product_repo,
            embedding_service,
        }
    }

    pub async fn execute(&self, options: StoreOptions) -> Result<SyncReport, DomainError> {
        let result = self.sync(options).await;

        self.product_repo.close().await;
        info!("MongoDB connection closed.");

        result
    }

    async fn sync(&self, options: StoreOptions) -> Result<SyncReport, DomainError> {
        let filter = if options.only_missing {
            ProductFilter::MissingEmbeddings
        } else {
            ProductFilter::All
        };

        let start_time = Instant::now();
        let products = self.product_repo.find_products(filter).await?;
        let total = products.len() as u64;

        info!(
            "Embedding {} products with model {}",
            total,
            self.embedding_service.config().model_name()
        );

        let progress_bar = ProgressBar::new(total);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut report = SyncReport::new(total);

        for product in &products {
            progress_bar.inc(1);

            let Some(text) = product.embeddable_text() else {
                warn!("Skipping product {}: no description to embed", product.id());
                report.record_skipped(product.id().clone());
                continue;
            };

            let vector = match self.embedding_service.embed_text(text).await {
                Ok(vector) => vector,
                Err(e) => {
                    warn!(
                        "Error generating embeddings for product {}: {}",
                        product.id(),
                        e
                    );
                    report.record_failed(product.id().clone());
                    continue;
                }
            };

            let updated = self
                .product_repo
                .set_embeddings(product.id(), &vector)
                .await
                .map_err(|e| {
                    progress_bar.abandon_with_message("aborted");
                    DomainError::storage(format!(
                        "Aborted after {} of {} products: {}",
                        report.processed(),
                        total,
                        e
                    ))
                })?;

            if updated {
                info!("Embeddings stored for product {}", product.id());
                report.record_embedded();
            } else {
                warn!("Product {} disappeared before its update", product.id());
                report.record_skipped(product.id().clone());
            }
        }

        progress_bar.finish_with_message("done");

        info!(
            "Stored embeddings for {}/{} products in {:.2?} ({} skipped, {} failed)",
            report.embedded(),
            total,
            start_time.elapsed(),
            report.skipped().len(),
            report.failed().len()
        );

        Ok(report)
    }
}
