//! Aufbau
//!
//! A schema-driven inventory service for enterprise architecture records
//! (applications, processes, roles, data assets, risks, compliance
//! requirements and the relationships between them), backed by a pluggable
//! document store and exposed over HTTP.
//!
//! # Architecture
//!
//! - [`schema`]: the static type registry and the payload validator
//! - [`store`]: the document store seam with RocksDB and in-memory backends
//! - [`graph`]: projection of stored records into a node/edge view
//! - [`http`]: the axum router, handlers and error mapping
//! - [`config`]: environment-derived runtime configuration
//!
//! # Example Usage
//!
//! ```rust
//! use aufbau::schema;
//! use serde_json::json;
//!
//! // Look up a registered type and validate a payload against it
//! let app = schema::resolve("application").unwrap();
//! let payload = json!({"name": "Billing Portal", "criticality": "high"});
//! let record = app.validate(payload.as_object().unwrap()).unwrap();
//!
//! // Declared fields that were omitted come back with their defaults
//! assert_eq!(record["lifecycle"], json!("active"));
//! assert_eq!(record["gdpr_data"], json!(false));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod http;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use config::Config;

pub use schema::{
    FieldKind, FieldSpec, TypeSchema, ValidationError,
};

pub use store::{
    DocumentStore, MemoryStore, RawDocument, RocksStore, StoreError, StoreResult,
};

pub use graph::{
    GraphEdge, GraphNode, GraphView,
};

pub use http::{
    ApiError, AppState, HttpServer,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
