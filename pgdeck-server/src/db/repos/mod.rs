//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Explicit `acquire()` per call; the guard releases on drop
//! - Table names are validated identifiers before any SQL is built
//! - Values are bound as parameters, never formatted into SQL text

pub mod catalog;
pub mod tables;

pub use catalog::CatalogRepo;
pub use tables::{build_insert, TableRepo, DATA_READ_TIMEOUT};
