use async_trait::async_trait;

use crate::domain::{
    DomainError, Product, ProductFilter, ProductId, ProductMatch, ProductSearchQuery,
};

/// Access to the products collection for the lifetime of one operation.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Reads every matching document in the store's native order.
    async fn find_products(&self, filter: ProductFilter) -> Result<Vec<Product>, DomainError>;

    /// Sets the embedding field on one document. Returns `false` when no
    /// document has that id.
    async fn set_embeddings(&self, id: &ProductId, embeddings: &[f32])
        -> Result<bool, DomainError>;

    /// Removes the embedding field from every document and returns how many
    /// documents actually changed.
    async fn unset_all_embeddings(&self) -> Result<u64, DomainError>;

    async fn count(&self, filter: ProductFilter) -> Result<u64, DomainError>;

    async fn vector_search(
        &self,
        query_embedding: &[f32],
        query: &ProductSearchQuery,
    ) -> Result<Vec<ProductMatch>, DomainError>;

    /// Releases the underlying connection. Safe to call more than once.
    async fn close(&self);
}
