mod embedding_service;
mod product_repository;

pub use embedding_service::*;
pub use product_repository::*;
