//! Error normalization for client-facing diagnostics
//!
//! Postgres errors carry a SQLSTATE code, message, detail and hint. These
//! are flattened into one string; anything else gets a generic message.

use sqlx::postgres::PgDatabaseError;

use super::DbError;

const UNEXPECTED: &str = "an unexpected error occurred";

/// Render a database error as a single diagnostic line.
pub fn describe_error(err: &DbError) -> String {
    err.sqlx_source()
        .and_then(describe_sqlx)
        .unwrap_or_else(|| UNEXPECTED.to_string())
}

fn describe_sqlx(err: &sqlx::Error) -> Option<String> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let pg = db_err.try_downcast_ref::<PgDatabaseError>()?;

    Some(format_pg_error(
        pg.message(),
        pg.code(),
        pg.detail().unwrap_or_default(),
        pg.hint().unwrap_or_default(),
    ))
}

fn format_pg_error(message: &str, code: &str, detail: &str, hint: &str) -> String {
    format!(
        "SQL Error: {} (Code: {}, Detail: {}, Hint: {})",
        message, code, detail, hint
    )
}
