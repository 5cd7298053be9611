//! Database connection pool management
//!
//! The pool is the only shared mutable resource in the gateway. Its
//! acquire timeout is kept below [`DATA_READ_TIMEOUT`] so an unreachable
//! database surfaces as a connection error rather than a read timeout.
//!
//! [`DATA_READ_TIMEOUT`]: crate::db::DATA_READ_TIMEOUT

use std::time::Duration;

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Default maximum connections for the pool.
/// Kept low for single-user tooling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default wait for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Sizing and wait limits for a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// Pool options for `settings`, not yet connected.
pub fn pool_options(settings: PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
}

/// Create a PostgreSQL connection pool with default settings.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the first
/// connection cannot be established within the acquire timeout.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/app").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, PoolSettings::default()).await
}

/// Create a PostgreSQL connection pool with custom settings.
pub async fn create_pool_with_options(
    database_url: &str,
    settings: PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
        "creating pool"
    );
    pool_options(settings).connect(database_url).await
}

/// Point-in-time connection counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Open connections, idle or in use
    pub size: u32,
    pub idle: usize,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const CLOSED_PORT_URL: &str = "postgres://pgdeck@127.0.0.1:1/pgdeck";

    #[test]
    fn default_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn options_carry_settings() {
        let options = pool_options(PoolSettings {
            max_connections: 2,
            acquire_timeout: Duration::from_millis(750),
        });

        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn lazy_pool_starts_empty() {
        let pool = pool_options(PoolSettings::default())
            .connect_lazy(CLOSED_PORT_URL)
            .unwrap();

        assert_eq!(PoolStats::of(&pool), PoolStats { size: 0, idle: 0 });
    }

    #[tokio::test]
    async fn unreachable_database_fails_within_acquire_timeout() {
        let pool = pool_options(PoolSettings {
            max_connections: 1,
            acquire_timeout: Duration::from_millis(300),
        })
        .connect_lazy(CLOSED_PORT_URL)
        .unwrap();

        let started = Instant::now();
        assert!(pool.acquire().await.is_err());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p pgdeck-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        assert!(PoolStats::of(&pool).size >= 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn exhausted_pool_times_out() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool_with_options(
            &url,
            PoolSettings {
                max_connections: 1,
                acquire_timeout: Duration::from_millis(200),
            },
        )
        .await
        .expect("pool creation failed");

        let held = pool.acquire().await.expect("first acquire");
        let err = pool.acquire().await.unwrap_err();
        assert!(matches!(err, sqlx::Error::PoolTimedOut));

        drop(held);
        assert!(pool.acquire().await.is_ok());
    }
}
