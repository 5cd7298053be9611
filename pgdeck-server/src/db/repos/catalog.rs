//! Catalog repository
//!
//! Read-only introspection of the `public` schema: server version,
//! relation names, column metadata and constraints.

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::DbError;
use crate::models::{ColumnDescriptor, ConstraintDescriptor, TableName};

const TABLE_NAMES_SQL: &str = r#"
    SELECT tablename::text
    FROM pg_tables
    WHERE schemaname = 'public'
"#;

const TABLE_SCHEMA_SQL: &str = r#"
    SELECT
        a.attname::text AS column_name,
        pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
        NOT a.attnotnull AS is_nullable,
        a.attnum::int4 AS column_order,
        pg_catalog.pg_get_expr(d.adbin, d.adrelid) AS default_value
    FROM pg_attribute a
    LEFT JOIN pg_attrdef d ON a.attnum = d.adnum AND a.attrelid = d.adrelid
    WHERE a.attrelid = $1::regclass
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY a.attnum
"#;

const CONSTRAINTS_SQL: &str = r#"
    SELECT
        c.conname::text AS constraint_name,
        rel_t1.relname::text AS source_table,
        a1.attname::text AS source_column,
        rel_t2.relname::text AS target_table,
        a2.attname::text AS target_column,
        c.contype::text AS constraint_type
    FROM pg_constraint c
    JOIN pg_class rel_t1 ON c.conrelid = rel_t1.oid
    JOIN pg_namespace n1 ON rel_t1.relnamespace = n1.oid
    LEFT JOIN pg_class rel_t2 ON c.confrelid = rel_t2.oid
    LEFT JOIN pg_namespace n2 ON rel_t2.relnamespace = n2.oid
    LEFT JOIN pg_attribute a1 ON a1.attrelid = rel_t1.oid AND a1.attnum = ANY (c.conkey)
    LEFT JOIN pg_attribute a2 ON a2.attrelid = rel_t2.oid AND a2.attnum = ANY (c.confkey)
    WHERE n1.nspname = 'public'
      AND (n2.nspname IS NULL OR n2.nspname = 'public')
"#;

#[derive(FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: bool,
    column_order: i32,
    default_value: Option<String>,
}

impl From<ColumnRow> for ColumnDescriptor {
    fn from(r: ColumnRow) -> Self {
        Self {
            column_name: r.column_name,
            data_type: r.data_type,
            is_nullable: r.is_nullable,
            column_order: r.column_order,
            default_value: r.default_value,
        }
    }
}

#[derive(FromRow)]
struct ConstraintRow {
    constraint_name: String,
    source_table: String,
    source_column: Option<String>,
    target_table: Option<String>,
    target_column: Option<String>,
    constraint_type: String,
}

impl From<ConstraintRow> for ConstraintDescriptor {
    fn from(r: ConstraintRow) -> Self {
        Self {
            constraint_name: r.constraint_name,
            source_table: r.source_table,
            source_column: r.source_column,
            target_table: r.target_table,
            target_column: r.target_column,
            constraint_type: r.constraint_type,
        }
    }
}

/// Declared type of every column of `table`, keyed by column name.
///
/// Runs on the caller's connection so it can precede a statement that
/// needs the types.
pub(crate) async fn column_types(
    conn: &mut PgConnection,
    table: &TableName,
) -> Result<HashMap<String, String>, DbError> {
    let rows = sqlx::query_as::<_, ColumnRow>(TABLE_SCHEMA_SQL)
        .bind(table.as_str())
        .fetch_all(conn)
        .await
        .map_err(DbError::query(format!("failed to load schema for {}", table)))?;

    Ok(rows
        .into_iter()
        .map(|r| (r.column_name, r.data_type))
        .collect())
}

/// Catalog repository
pub struct CatalogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Full `version()` string of the connected server.
    pub async fn server_version(&self) -> Result<String, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;

        sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&mut *conn)
            .await
            .map_err(DbError::query("query failed"))
    }

    /// Relation names in the public schema, in catalog scan order.
    ///
    /// An empty schema is reported as `NotFound`.
    pub async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;

        let names = sqlx::query_scalar::<_, String>(TABLE_NAMES_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::query("failed to execute query for table names"))?;

        if names.is_empty() {
            return Err(DbError::NotFound {
                resource: "tables",
                schema: "public",
            });
        }

        Ok(names)
    }

    /// Column metadata for one relation, ordered by ordinal position.
    ///
    /// The name is passed through a `regclass` cast, so an unknown
    /// relation fails with a query error rather than an empty list.
    pub async fn table_schema(&self, table: &TableName) -> Result<Vec<ColumnDescriptor>, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;

        let rows = sqlx::query_as::<_, ColumnRow>(TABLE_SCHEMA_SQL)
            .bind(table.as_str())
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::query(format!("failed to load schema for {}", table)))?;

        Ok(rows.into_iter().map(ColumnDescriptor::from).collect())
    }

    /// Constraints whose source (and target, if any) live in public.
    ///
    /// Multi-column constraints yield one entry per column pairing.
    pub async fn list_constraints(&self) -> Result<Vec<ConstraintDescriptor>, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;

        let rows = sqlx::query_as::<_, ConstraintRow>(CONSTRAINTS_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::query("failed to execute constraints query"))?;

        Ok(rows.into_iter().map(ConstraintDescriptor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, pool_options, PoolSettings};
    use sqlx::postgres::PgConnectOptions;
    use std::str::FromStr;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p pgdeck-server -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        create_pool(&url).await.expect("pool creation failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn version_mentions_postgres() {
        let pool = pool().await;
        let version = CatalogRepo::new(&pool).server_version().await.unwrap();
        assert!(version.starts_with("PostgreSQL"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_tables_in_fresh_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let admin = create_pool(&url).await.unwrap();
        sqlx::query("DROP DATABASE IF EXISTS pgdeck_catalog_scratch")
            .execute(&admin)
            .await
            .unwrap();
        sqlx::query("CREATE DATABASE pgdeck_catalog_scratch")
            .execute(&admin)
            .await
            .unwrap();

        let options = PgConnectOptions::from_str(&url)
            .unwrap()
            .database("pgdeck_catalog_scratch");
        let scratch = pool_options(PoolSettings::default())
            .connect_with(options)
            .await
            .unwrap();
        let repo = CatalogRepo::new(&scratch);

        let err = repo.list_tables().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "tables",
                schema: "public"
            }
        ));

        sqlx::query("CREATE TABLE only_one (id int)")
            .execute(&scratch)
            .await
            .unwrap();
        assert_eq!(repo.list_tables().await.unwrap(), vec!["only_one".to_string()]);

        scratch.close().await;
        sqlx::query("DROP DATABASE pgdeck_catalog_scratch")
            .execute(&admin)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn column_types_keyed_by_name() {
        let pool = pool().await;
        sqlx::query("DROP TABLE IF EXISTS pgdeck_catalog_types")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE pgdeck_catalog_types (born date, label varchar(8))")
            .execute(&pool)
            .await
            .unwrap();
        let table = TableName::new("pgdeck_catalog_types").unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let types = column_types(&mut conn, &table).await.unwrap();
        drop(conn);

        assert_eq!(types.get("born").map(String::as_str), Some("date"));
        assert_eq!(
            types.get("label").map(String::as_str),
            Some("character varying(8)")
        );

        sqlx::query("DROP TABLE pgdeck_catalog_types")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_table_schema_is_query_error() {
        let pool = pool().await;
        let table = TableName::new("pgdeck_no_such_table").unwrap();

        let err = CatalogRepo::new(&pool).table_schema(&table).await.unwrap_err();
        assert!(matches!(err, DbError::Query { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn schema_and_constraints_for_new_table() {
        let pool = pool().await;
        sqlx::query("DROP TABLE IF EXISTS pgdeck_catalog_child, pgdeck_catalog_parent")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE pgdeck_catalog_parent (id serial PRIMARY KEY, name text NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE pgdeck_catalog_child (id serial PRIMARY KEY, \
             parent_id int REFERENCES pgdeck_catalog_parent(id))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = CatalogRepo::new(&pool);
        let table = TableName::new("pgdeck_catalog_parent").unwrap();
        let schema = repo.table_schema(&table).await.unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].column_name, "id");
        assert_eq!(schema[0].column_order, 1);
        assert!(!schema[0].is_nullable);
        assert!(schema[0].default_value.as_deref().unwrap().starts_with("nextval"));
        assert_eq!(schema[1].data_type, "text");

        let tables = repo.list_tables().await.unwrap();
        assert!(tables.iter().any(|t| t == "pgdeck_catalog_parent"));

        let constraints = repo.list_constraints().await.unwrap();
        let fk = constraints
            .iter()
            .find(|c| c.source_table == "pgdeck_catalog_child" && c.constraint_type == "f")
            .expect("foreign key listed");
        assert_eq!(fk.source_column.as_deref(), Some("parent_id"));
        assert_eq!(fk.target_table.as_deref(), Some("pgdeck_catalog_parent"));
        assert_eq!(fk.target_column.as_deref(), Some("id"));

        sqlx::query("DROP TABLE pgdeck_catalog_child, pgdeck_catalog_parent")
            .execute(&pool)
            .await
            .unwrap();
    }
}
