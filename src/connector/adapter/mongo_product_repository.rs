use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ProductRepository;
use crate::domain::{
    DomainError, Product, ProductFilter, ProductId, ProductMatch, ProductSearchQuery,
};

pub const TEXT_FIELD: &str = "description";
pub const EMBEDDING_FIELD: &str = "embeddings";

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
}

/// Products collection backed by MongoDB.
pub struct MongoProductRepository {
    client: Mutex<Option<Client>>,
    collection: Collection<Document>,
}

impl MongoProductRepository {
    /// Opens a client and pings the database so that an unreachable server
    /// is reported here instead of on the first query.
    pub async fn connect(config: &MongoConfig) -> Result<Self, DomainError> {
        info!("MongoDB URI: {}", redact_uri(&config.uri));

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| DomainError::connection(format!("Invalid MongoDB URI: {}", e)))?;
        options.server_selection_timeout = Some(config.connect_timeout);
        options.connect_timeout = Some(config.connect_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)
            .map_err(|e| DomainError::connection(format!("Failed to create client: {}", e)))?;

        let database = client.database(&config.database);
        if let Err(e) = database.run_command(doc! { "ping": 1 }).await {
            client.shutdown().await;
            return Err(DomainError::connection(format!("Connection failed: {}", e)));
        }

        info!("Connection to MongoDB successful");
        debug!(
            "Using collection {}.{}",
            config.database, config.collection
        );

        Ok(Self {
            collection: database.collection::<Document>(&config.collection),
            client: Mutex::new(Some(client)),
        })
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn find_products(&self, filter: ProductFilter) -> Result<Vec<Product>, DomainError> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query products: {}", e)))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read products: {}", e)))?;

        debug!("Fetched {} product documents", documents.len());

        documents.iter().map(product_from_document).collect()
    }

    async fn set_embeddings(
        &self,
        id: &ProductId,
        embeddings: &[f32],
    ) -> Result<bool, DomainError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id_to_bson(id)? },
                set_embeddings_update(embeddings),
            )
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to update product {}: {}", id, e))
            })?;

        Ok(result.matched_count > 0)
    }

    async fn unset_all_embeddings(&self) -> Result<u64, DomainError> {
        let result = self
            .collection
            .update_many(doc! {}, unset_embeddings_update())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete embeddings: {}", e)))?;

        Ok(result.modified_count)
    }

    async fn count(&self, filter: ProductFilter) -> Result<u64, DomainError> {
        self.collection
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count products: {}", e)))
    }

    async fn vector_search(
        &self,
        query_embedding: &[f32],
        query: &ProductSearchQuery,
    ) -> Result<Vec<ProductMatch>, DomainError> {
        let cursor = self
            .collection
            .aggregate(search_pipeline(query_embedding, query))
            .await
            .map_err(|e| DomainError::storage(format!("Vector search failed: {}", e)))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read search results: {}", e)))?;

        Ok(documents.iter().map(match_from_document).collect())
    }

    async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            client.shutdown().await;
        }
    }
}

/// An embedding counts as present only when it is an array of numbers, the
/// same rule `vector_from_bson` applies when reading. Absent fields, the
/// `null` left by earlier failed runs and malformed values are all missing.
fn filter_document(filter: ProductFilter) -> Document {
    match filter {
        ProductFilter::All => doc! {},
        ProductFilter::WithEmbeddings => doc! { EMBEDDING_FIELD: numeric_array_condition() },
        ProductFilter::MissingEmbeddings => {
            doc! { "$nor": [ { EMBEDDING_FIELD: numeric_array_condition() } ] }
        }
    }
}

fn numeric_array_condition() -> Document {
    doc! {
        "$type": "array",
        "$not": { "$elemMatch": { "$not": { "$type": "number" } } },
    }
}

fn set_embeddings_update(embeddings: &[f32]) -> Document {
    let vector: Vec<Bson> = embeddings.iter().map(|&v| Bson::Double(v as f64)).collect();
    doc! { "$set": { EMBEDDING_FIELD: vector } }
}

fn unset_embeddings_update() -> Document {
    doc! { "$unset": { EMBEDDING_FIELD: "" } }
}

fn search_pipeline(query_embedding: &[f32], query: &ProductSearchQuery) -> Vec<Document> {
    let vector: Vec<Bson> = query_embedding
        .iter()
        .map(|&v| Bson::Double(v as f64))
        .collect();

    vec![
        doc! {
            "$vectorSearch": {
                "index": query.index(),
                "queryVector": vector,
                "path": EMBEDDING_FIELD,
                "numCandidates": query.num_candidates() as i64,
                "limit": query.limit() as i64,
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "name": 1,
                TEXT_FIELD: 1,
                "score": { "$meta": "vectorSearchScore" },
            }
        },
        doc! { "$match": { "score": { "$gt": query.min_score() as f64 } } },
    ]
}

fn product_from_document(document: &Document) -> Result<Product, DomainError> {
    let id = document
        .get("_id")
        .map(id_from_bson)
        .ok_or_else(|| DomainError::storage("Product document has no _id"))?;

    let description = document.get_str(TEXT_FIELD).ok().map(String::from);
    let mut product = Product::new(id, description);

    if let Ok(name) = document.get_str("name") {
        product = product.with_name(name);
    }
    if let Some(vector) = document.get(EMBEDDING_FIELD).and_then(vector_from_bson) {
        product = product.with_embeddings(vector);
    }

    Ok(product)
}

fn match_from_document(document: &Document) -> ProductMatch {
    let score = match document.get("score") {
        Some(Bson::Double(v)) => *v as f32,
        Some(Bson::Int32(v)) => *v as f32,
        Some(Bson::Int64(v)) => *v as f32,
        _ => 0.0,
    };

    ProductMatch::new(
        document.get_str("name").ok().map(String::from),
        document.get_str(TEXT_FIELD).ok().map(String::from),
        score,
    )
}

fn vector_from_bson(value: &Bson) -> Option<Vec<f32>> {
    let Bson::Array(items) = value else {
        return None;
    };

    items
        .iter()
        .map(|item| match item {
            Bson::Double(v) => Some(*v as f32),
            Bson::Int32(v) => Some(*v as f32),
            Bson::Int64(v) => Some(*v as f32),
            _ => None,
        })
        .collect()
}

fn id_from_bson(value: &Bson) -> ProductId {
    match value {
        Bson::ObjectId(oid) => ProductId::ObjectId(oid.to_hex()),
        Bson::Int32(v) => ProductId::Int(*v as i64),
        Bson::Int64(v) => ProductId::Int(*v),
        Bson::String(s) => ProductId::String(s.clone()),
        other => ProductId::Other(other.clone()),
    }
}

fn id_to_bson(id: &ProductId) -> Result<Bson, DomainError> {
    match id {
        ProductId::ObjectId(hex) => ObjectId::parse_str(hex)
            .map(Bson::ObjectId)
            .map_err(|e| DomainError::invalid_input(format!("Invalid ObjectId {}: {}", hex, e))),
        ProductId::Int(v) => Ok(Bson::Int64(*v)),
        ProductId::String(s) => Ok(Bson::String(s.clone())),
        ProductId::Other(value) => Ok(value.clone()),
    }
}

/// Hides the password of a connection string before it is logged.
pub fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = uri[authority_start..]
        .find(['/', '?'])
        .map_or(uri.len(), |i| authority_start + i);
    let authority = &uri[authority_start..authority_end];

    let Some(at) = authority.rfind('@') else {
        return uri.to_string();
    };
    let Some((user, _password)) = authority[..at].split_once(':') else {
        return uri.to_string();
    };

    format!(
        "{}{}:****{}",
        &uri[..authority_start],
        user,
        &uri[authority_start + at..]
    )
}
