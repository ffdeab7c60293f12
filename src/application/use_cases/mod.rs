mod delete_embeddings;
mod embedding_status;
mod search_products;
mod store_embeddings;

pub use delete_embeddings::*;
pub use embedding_status::*;
pub use search_products::*;
pub use store_embeddings::*;
