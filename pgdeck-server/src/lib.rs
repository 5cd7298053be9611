//! pgdeck-server: HTTP gateway over Postgres introspection
//!
//! Exposes server version, table names, column schemas, constraints and
//! raw table rows as JSON, plus a schema-driven row insert.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError};
pub use http::{run_server, ServerConfig, ServerError};
