pub mod application;
pub mod cli;
pub mod config;
pub mod connector;
pub mod domain;

pub use application::{
    DeleteEmbeddingsUseCase, EmbeddingService, EmbeddingStatusUseCase, ProductRepository,
    SearchProductsUseCase, StoreEmbeddingsUseCase, StoreOptions,
};

pub use cli::{Commands, OutputFormat};

pub use config::AppConfig;

pub use connector::{
    redact_uri, Container, ContainerConfig, MockEmbedding, MongoConfig, MongoProductRepository,
    OrtEmbedding, Router,
};

pub use domain::{
    DomainError, EmbeddingConfig, EmbeddingStatus, Product, ProductFilter, ProductId,
    ProductMatch, ProductSearchQuery, SyncReport,
};
