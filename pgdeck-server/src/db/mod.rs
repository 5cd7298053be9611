//! Query layer - connection pool, repositories and error normalization
//!
//! Every operation is a single autocommit statement. Each repository
//! method acquires one pooled connection for its duration; the guard
//! returns it to the pool on every exit path.

pub mod decode;
pub mod describe;
pub mod error;
pub mod pool;
pub mod repos;

pub use describe::describe_error;
pub use error::DbError;
pub use pool::{
    create_pool, create_pool_with_options, pool_options, PoolSettings, PoolStats,
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
};
pub use repos::{CatalogRepo, TableRepo, DATA_READ_TIMEOUT};
