//! # Connector Layer
//!
//! External integrations implementing the application interfaces:
//! - Embedding generation (ONNX Runtime, plus a deterministic mock)
//! - Storage (MongoDB products collection)
//! - CLI wiring (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
