//! # Domain Layer
//!
//! Core models and errors for the embedding sync.
//! This layer is independent of MongoDB and the embedding runtime.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
