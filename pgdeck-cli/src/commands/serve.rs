//! HTTP server command
//!
//! Opens the pool, checks the server version and runs the gateway until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use pgdeck_server::db::{
    create_pool_with_options, CatalogRepo, PoolSettings, DEFAULT_ACQUIRE_TIMEOUT,
    DEFAULT_MAX_CONNECTIONS,
};
use pgdeck_server::http::server::DEFAULT_ALLOWED_ORIGIN;
use pgdeck_server::{run_server, ServerConfig};

use crate::config::require_database_url;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "PGDECK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Browser origin allowed by CORS (credentials are allowed for it)
    #[arg(long, env = "PGDECK_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// Maximum pooled connections
    #[arg(long, env = "PGDECK_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing with 503
    #[arg(long, env = "PGDECK_ACQUIRE_TIMEOUT", default_value_t = DEFAULT_ACQUIRE_TIMEOUT.as_secs())]
    pub acquire_timeout: u64,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = require_database_url(args.database_url)?;

    let settings = PoolSettings {
        max_connections: args.max_connections,
        acquire_timeout: Duration::from_secs(args.acquire_timeout),
    };
    let pool = create_pool_with_options(&database_url, settings)
        .await
        .context("Failed to create database pool")?;

    let version = CatalogRepo::new(&pool)
        .server_version()
        .await
        .context("Failed to get PostgreSQL version")?;
    tracing::info!(%version, "Connected to database");

    let config = ServerConfig {
        bind_addr: args.bind,
        allowed_origin: args.allowed_origin,
    };

    tracing::info!("Starting pgdeck server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
