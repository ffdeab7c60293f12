use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::{
    DeleteEmbeddingsUseCase, DomainError, EmbeddingService, EmbeddingStatusUseCase, MockEmbedding,
    MongoConfig, MongoProductRepository, OrtEmbedding, ProductRepository, SearchProductsUseCase,
    StoreEmbeddingsUseCase,
};

pub struct ContainerConfig {
    pub app: AppConfig,
    pub mock_embeddings: bool,
}

/// Builds the collaborators of one run. Every use case gets a fresh database
/// connection, and the embedding model is only loaded once that connection
/// is up, so an unreachable server fails before any model download.
pub struct Container {
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    pub async fn connect(&self) -> Result<Arc<dyn ProductRepository>, DomainError> {
        let mongo_config = MongoConfig {
            uri: self.config.app.mongodb_url.clone(),
            database: self.config.app.database.clone(),
            collection: self.config.app.collection.clone(),
            connect_timeout: self.config.app.connect_timeout,
        };

        let repo = MongoProductRepository::connect(&mongo_config)
            .await
            .map_err(|e| DomainError::connection(format!("No database available: {}", e)))?;

        Ok(Arc::new(repo))
    }

    fn build_embedding_service(&self) -> Result<Arc<dyn EmbeddingService>, DomainError> {
        if self.config.mock_embeddings {
            debug!("Using mock embedding service");
            return Ok(Arc::new(MockEmbedding::with_dimensions(
                self.config.app.dimensions,
            )));
        }

        debug!("Initializing ONNX embedding service...");
        let service = OrtEmbedding::new(
            Some(&self.config.app.model_id),
            self.config.app.dimensions,
        )?;
        Ok(Arc::new(service))
    }

    /// Connects, then loads the model. The connection is closed again if the
    /// model cannot be loaded.
    async fn connect_with_model(
        &self,
    ) -> Result<(Arc<dyn ProductRepository>, Arc<dyn EmbeddingService>), DomainError> {
        let repo = self.connect().await?;

        match self.build_embedding_service() {
            Ok(embedding_service) => Ok((repo, embedding_service)),
            Err(e) => {
                repo.close().await;
                Err(e)
            }
        }
    }

    pub async fn store_use_case(&self) -> Result<StoreEmbeddingsUseCase, DomainError> {
        let (repo, embedding_service) = self.connect_with_model().await?;
        Ok(StoreEmbeddingsUseCase::new(repo, embedding_service))
    }

    pub async fn delete_use_case(&self) -> Result<DeleteEmbeddingsUseCase, DomainError> {
        Ok(DeleteEmbeddingsUseCase::new(self.connect().await?))
    }

    pub async fn status_use_case(&self) -> Result<EmbeddingStatusUseCase, DomainError> {
        Ok(EmbeddingStatusUseCase::new(self.connect().await?))
    }

    pub async fn search_use_case(&self) -> Result<SearchProductsUseCase, DomainError> {
        let (repo, embedding_service) = self.connect_with_model().await?;
        Ok(SearchProductsUseCase::new(repo, embedding_service))
    }

    /// `database.collection`, for messages.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.config.app.database, self.config.app.collection)
    }

    pub fn vector_index(&self) -> &str {
        &self.config.app.vector_index
    }
}
