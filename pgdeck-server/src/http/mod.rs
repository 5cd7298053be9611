//! HTTP layer
//!
//! Axum server with:
//! - Single-origin CORS with credentials
//! - Request tracing
//! - Graceful shutdown
//! - Plain-text errors, JSON `{error, details}` for failed inserts

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
