//! # Application Layer
//!
//! Use cases coordinating the product repository and the embedding model.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
