use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::{DomainError, DEFAULT_DIMENSIONS, DEFAULT_MODEL_ID, DEFAULT_VECTOR_INDEX};

pub const DEFAULT_DATABASE: &str = "shopnexus";
pub const DEFAULT_COLLECTION: &str = "products";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings read from the process environment (and `.env`, loaded by `main`).
#[derive(Clone)]
pub struct AppConfig {
    pub mongodb_url: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
    pub model_id: String,
    pub dimensions: usize,
    pub vector_index: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("mongodb_url", &"[REDACTED]")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("connect_timeout", &self.connect_timeout)
            .field("model_id", &self.model_id)
            .field("dimensions", &self.dimensions)
            .field("vector_index", &self.vector_index)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_url = lookup("MONGODB_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DomainError::config("MONGODB_URL is missing"))?;

        Ok(Self {
            mongodb_url,
            database: lookup_or(&lookup, "MONGODB_DATABASE", DEFAULT_DATABASE),
            collection: lookup_or(&lookup, "MONGODB_COLLECTION", DEFAULT_COLLECTION),
            connect_timeout: Duration::from_secs(lookup_or_parse(
                &lookup,
                "MONGODB_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            model_id: lookup_or(&lookup, "EMBEDDING_MODEL", DEFAULT_MODEL_ID),
            dimensions: lookup_or_parse(&lookup, "EMBEDDING_DIMENSIONS", DEFAULT_DIMENSIONS),
            vector_index: lookup_or(&lookup, "VECTOR_INDEX", DEFAULT_VECTOR_INDEX),
        })
    }
}

fn lookup_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn lookup_or_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        None => default,
    }
}
