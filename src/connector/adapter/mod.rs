mod mock_embedding;
mod mongo_product_repository;
mod ort_embedding;

pub use mock_embedding::*;
pub use mongo_product_repository::*;
pub use ort_embedding::*;
