//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use shopnexus_embed::{
    DomainError, EmbeddingConfig, EmbeddingService, MockEmbedding, Product, ProductFilter,
    ProductId, ProductMatch, ProductRepository, ProductSearchQuery,
};

/// Products collection kept in a `Vec`, so "native order" is insertion order.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    fail_update_on: Option<ProductId>,
    fail_reads: bool,
    closed: AtomicBool,
    close_calls: AtomicUsize,
}

impl InMemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn failing_update_on(mut self, id: impl Into<ProductId>) -> Self {
        self.fail_update_on = Some(id.into());
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    pub async fn get(&self, id: impl Into<ProductId>) -> Option<Product> {
        let id = id.into();
        self.products
            .lock()
            .await
            .iter()
            .find(|p| p.id() == &id)
            .cloned()
    }

    /// Makes a closed repository usable again, like a fresh connection.
    pub fn reopen(&self) {
        self.closed.store(false, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_closed() {
            return Err(DomainError::connection("Connection already closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_products(&self, filter: ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.ensure_open()?;
        if self.fail_reads {
            return Err(DomainError::storage("cursor lost"));
        }

        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn set_embeddings(
        &self,
        id: &ProductId,
        embeddings: &[f32],
    ) -> Result<bool, DomainError> {
        self.ensure_open()?;
        if self.fail_update_on.as_ref() == Some(id) {
            return Err(DomainError::storage(format!("network drop while updating {}", id)));
        }

        let mut products = self.products.lock().await;
        match products.iter_mut().find(|p| p.id() == id) {
            Some(product) => {
                product.set_embeddings(embeddings.to_vec());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unset_all_embeddings(&self) -> Result<u64, DomainError> {
        self.ensure_open()?;

        let mut products = self.products.lock().await;
        Ok(products
            .iter_mut()
            .map(|p| p.clear_embeddings())
            .filter(|&changed| changed)
            .count() as u64)
    }

    async fn count(&self, filter: ProductFilter) -> Result<u64, DomainError> {
        Ok(self.find_products(filter).await?.len() as u64)
    }

    async fn vector_search(
        &self,
        query_embedding: &[f32],
        query: &ProductSearchQuery,
    ) -> Result<Vec<ProductMatch>, DomainError> {
        self.ensure_open()?;

        let products = self.products.lock().await;
        let mut scored: Vec<(f32, &Product)> = products
            .iter()
            .filter_map(|p| {
                p.embeddings()
                    .map(|e| (cosine_similarity(query_embedding, e), p))
            })
            .filter(|(score, _)| *score > query.min_score())
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(query.limit())
            .map(|(score, p)| {
                ProductMatch::new(
                    p.name().map(String::from),
                    p.description().map(String::from),
                    score,
                )
            })
            .collect())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Mock model that errors on one specific text.
pub struct FlakyEmbedding {
    inner: MockEmbedding,
    poison: String,
}

impl FlakyEmbedding {
    pub fn failing_on(poison: &str) -> Self {
        Self {
            inner: MockEmbedding::new(),
            poison: poison.to_string(),
        }
    }
}

#[async_trait]
impl EmbeddingService for FlakyEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text == self.poison {
            return Err(DomainError::embedding("model runtime error"));
        }
        self.inner.embed_text(text).await
    }

    fn config(&self) -> &EmbeddingConfig {
        self.inner.config()
    }
}

pub fn shoes_and_hat() -> Vec<Product> {
    vec![
        Product::new(1, Some("red shoes".to_string())).with_name("Runner"),
        Product::new(2, Some("blue hat".to_string())).with_name("Cap"),
    ]
}
