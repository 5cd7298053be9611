//! One-shot database report
//!
//! Prints the server version, table names, column schemas and
//! constraints of the public schema as a single JSON document.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use pgdeck_server::db::{create_pool_with_options, CatalogRepo, DbError, PoolSettings};
use pgdeck_server::models::{ColumnDescriptor, ConstraintDescriptor, TableName};

use crate::config::require_database_url;

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Only report the schema of this table
    #[arg(long, short = 't')]
    pub table: Option<String>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TableReport {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub version: String,
    pub table_names: Vec<String>,
    pub tables: Vec<TableReport>,
    pub constraints: Vec<ConstraintDescriptor>,
}

/// Pick the tables whose schema gets reported.
///
/// An explicit `--table` must be a valid identifier. When listing every
/// table, names that need quoting are skipped.
fn selected_tables(all: &[String], only: Option<&str>) -> Result<Vec<TableName>> {
    if let Some(name) = only {
        return Ok(vec![TableName::new(name)?]);
    }

    Ok(all
        .iter()
        .filter_map(|name| match TableName::new(name) {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!(table = %name, error = %e, "skipping table");
                None
            }
        })
        .collect())
}

/// Run the inspect command
pub async fn run_inspect(args: InspectArgs) -> Result<()> {
    let database_url = require_database_url(args.database_url)?;

    let settings = PoolSettings {
        max_connections: 1,
        ..PoolSettings::default()
    };
    let pool = create_pool_with_options(&database_url, settings)
        .await
        .context("Failed to create database pool")?;
    let repo = CatalogRepo::new(&pool);

    let version = repo
        .server_version()
        .await
        .context("Failed to get PostgreSQL version")?;

    let table_names = match repo.list_tables().await {
        Ok(names) => names,
        Err(DbError::NotFound { .. }) => {
            tracing::warn!("No tables found in the public schema");
            Vec::new()
        }
        Err(e) => return Err(e).context("Could not get table names"),
    };

    let mut tables = Vec::new();
    for table in selected_tables(&table_names, args.table.as_deref())? {
        let columns = repo
            .table_schema(&table)
            .await
            .with_context(|| format!("Getting table schema for table {} failed", table))?;
        tables.push(TableReport {
            name: table.as_str().to_owned(),
            columns,
        });
    }

    let constraints = repo
        .list_constraints()
        .await
        .context("Getting constraints failed")?;

    pool.close().await;

    let report = InspectReport {
        version,
        table_names,
        tables,
        constraints,
    };

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    Ok(())
}
