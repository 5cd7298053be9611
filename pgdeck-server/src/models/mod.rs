//! Domain models with validation at construction
//!
//! Identifiers coming from URLs or request bodies are validated when
//! these types are built. Invalid input returns ValidationError, not panic.

pub mod catalog;
pub mod identifier;
pub mod payload;
pub mod validation;
pub mod value;

pub use catalog::{ColumnDescriptor, ConstraintDescriptor};
pub use identifier::{is_valid_table_name, ColumnName, TableName};
pub use payload::InsertPayload;
pub use validation::ValidationError;
pub use value::{Record, Value};
