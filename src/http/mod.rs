//! HTTP surface
//!
//! The axum router, its handlers and the error mapping. Routes are generic
//! over the record type registry; the server applies permissive CORS and
//! request tracing and shuts down gracefully on signal.

pub mod error;
pub mod handler;
pub mod server;

pub use error::ApiError;
pub use server::{router, AppState, HttpServer};
