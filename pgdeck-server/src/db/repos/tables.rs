//! Table data repository
//!
//! Reads every row of a table and inserts a single row built from an
//! arbitrary column/value payload.

use std::collections::HashMap;
use std::time::Duration;

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::PgPool;

use super::catalog::column_types;
use crate::db::decode::record_from_row;
use crate::db::DbError;
use crate::models::{InsertPayload, Record, TableName, Value};

/// Deadline for a full-table read, including connection acquisition.
pub const DATA_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Build `INSERT INTO t (cols) VALUES (..) RETURNING *` for a payload.
///
/// Columns appear in payload order. Nulls are written as the `NULL`
/// literal so they take the column's type; every other value gets the
/// next positional parameter. JSON strings are bound as `text`, which has
/// no assignment cast to most types, so a string placeholder is cast to
/// the column's declared type from `column_types` unless that type is
/// already a string type. Returns the SQL and the values to bind, in
/// parameter order.
pub fn build_insert<'p>(
    table: &TableName,
    payload: &'p InsertPayload,
    column_types: &HashMap<String, String>,
) -> (String, Vec<&'p Value>) {
    let mut columns = Vec::with_capacity(payload.len());
    let mut placeholders = Vec::with_capacity(payload.len());
    let mut params = Vec::with_capacity(payload.len());

    for (column, value) in payload.iter() {
        columns.push(column.as_str());
        if value.is_null() {
            placeholders.push("NULL".to_string());
            continue;
        }

        params.push(value);
        // Unquoted identifiers fold to lower case
        let declared = column_types.get(&column.as_str().to_ascii_lowercase());
        match (value, declared) {
            (Value::Text(_), Some(ty)) if !is_string_type(ty) => {
                placeholders.push(format!("${}::{}", params.len(), ty))
            }
            _ => placeholders.push(format!("${}", params.len())),
        }
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );

    (sql, params)
}

/// Types text is assignable to as-is. An explicit cast to `varchar(n)`
/// would truncate instead of failing, so these are left uncast.
fn is_string_type(ty: &str) -> bool {
    !ty.ends_with("[]")
        && (ty == "text"
            || ty == "name"
            || ty == "citext"
            || ty == "\"char\""
            || ty.starts_with("character"))
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::Float(f) => query.bind(f),
        Value::Numeric(d) => query.bind(d),
        Value::Text(s) => query.bind(s),
        Value::Bytes(b) => query.bind(b),
        Value::Timestamp(ts) => query.bind(ts),
        Value::LocalTimestamp(ts) => query.bind(ts),
        Value::Date(d) => query.bind(d),
        Value::Time(t) => query.bind(t),
        Value::Json(j) => query.bind(j),
    }
}

/// Table data repository
pub struct TableRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TableRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every row of `table`, keyed by the result set's column names.
    ///
    /// Bounded by [`DATA_READ_TIMEOUT`]; on expiry the in-flight query is
    /// dropped and its connection goes back to the pool.
    pub async fn fetch_all(&self, table: &TableName) -> Result<Vec<Record>, DbError> {
        let sql = format!("SELECT * FROM {}", table);

        let read = async {
            let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;
            sqlx::query(&sql)
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::query(format!("error querying table {}", table)))
        };

        let rows = tokio::time::timeout(DATA_READ_TIMEOUT, read)
            .await
            .map_err(|_| DbError::Timeout {
                table: table.to_string(),
                seconds: DATA_READ_TIMEOUT.as_secs(),
            })??;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Insert one row. The `RETURNING *` rows are only traced.
    pub async fn insert(&self, table: &TableName, payload: &InsertPayload) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;
        let types = column_types(&mut conn, table).await?;

        let (sql, params) = build_insert(table, payload, &types);
        tracing::debug!(sql = %sql, params = params.len(), "insert statement");

        let mut query = sqlx::query(&sql);
        for value in params {
            query = bind_value(query, value);
        }

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::query("failed to execute query"))?;

        for row in &rows {
            let record = record_from_row(row);
            tracing::debug!(
                table = %table,
                row = %serde_json::to_string(&record).unwrap_or_default(),
                "inserted row"
            );
        }

        Ok(())
    }
}
