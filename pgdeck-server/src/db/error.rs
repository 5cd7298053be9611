//! Query layer error type

use crate::models::ValidationError;

/// Errors raised by repository operations
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No connection could be taken from the pool
    #[error("failed to acquire connection from pool: {0}")]
    Connection(#[source] sqlx::Error),

    /// Input rejected before reaching the database
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Statement execution or row decoding failed
    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Statement exceeded its deadline
    #[error("query on {table} timed out after {seconds} seconds")]
    Timeout { table: String, seconds: u64 },

    /// Result set was empty where at least one row is required
    #[error("no {resource} found in the {schema} schema")]
    NotFound {
        resource: &'static str,
        schema: &'static str,
    },
}

impl DbError {
    pub(crate) fn query(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let context = context.into();
        move |source| Self::Query { context, source }
    }

    /// The underlying driver error, if any
    pub fn sqlx_source(&self) -> Option<&sqlx::Error> {
        match self {
            Self::Connection(e) | Self::Query { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
