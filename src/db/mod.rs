//! Shared PostgreSQL handle.
//!
//! The pool is opened once at startup by [`connect`] and published to
//! process-wide state; [`get`] hands out clones of it. Nothing closes it
//! after a successful connect.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Connection;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_HOST: &str = "db";
const DEFAULT_PORT: &str = "5432";

const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_MAX_LIFETIME_SECS: u64 = 300;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

/// Liveness check deadline used by [`connect`].
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

static POOL: OnceLock<PgPool> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to open database handle: {0}")]
    Open(#[source] sqlx::Error),

    #[error("database ping failed: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("database ping timed out after {0:?}")]
    PingTimeout(Duration),
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
}

// Keeps credentials out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("max_lifetime", &self.max_lifetime)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_lifetime: Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves the configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            url: resolve_url(&lookup),
            max_connections,
            max_lifetime: Duration::from_secs(parse_u64(
                "DB_MAX_LIFETIME_SECS",
                DEFAULT_MAX_LIFETIME_SECS,
            )),
            idle_timeout: Duration::from_secs(parse_u64(
                "DB_IDLE_TIMEOUT_SECS",
                DEFAULT_IDLE_TIMEOUT_SECS,
            )),
        }
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the `POSTGRES_*`
/// variables.
fn resolve_url<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
        return url;
    }

    let var = |key: &str| lookup(key).unwrap_or_default();
    let or_default = |key: &str, default: &str| {
        lookup(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode=disable",
        var("POSTGRES_USER"),
        var("POSTGRES_PASSWORD"),
        or_default("POSTGRES_HOST", DEFAULT_HOST),
        or_default("POSTGRES_PORT", DEFAULT_PORT),
        var("POSTGRES_DB"),
    )
}

/// Opens the pool, pings it and publishes it for [`get`].
///
/// # Errors
///
/// Returns [`ConnectionError`] when the URL cannot be parsed or the store does
/// not answer the ping within [`PING_TIMEOUT`]. The pool is closed before the
/// error is returned.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, ConnectionError> {
    info!(
        max_connections = config.max_connections,
        max_lifetime = ?config.max_lifetime,
        idle_timeout = ?config.idle_timeout,
        "Opening PostgreSQL pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_lazy(&config.url)
        .map_err(ConnectionError::Open)?;

    let ping = async {
        let mut conn = pool.acquire().await?;
        conn.ping().await
    };

    match tokio::time::timeout(PING_TIMEOUT, ping).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            pool.close().await;
            return Err(ConnectionError::Ping(e));
        }
        Err(_) => {
            pool.close().await;
            return Err(ConnectionError::PingTimeout(PING_TIMEOUT));
        }
    }

    if POOL.set(pool.clone()).is_err() {
        warn!("Database handle already initialised, keeping the existing one");
        pool.close().await;
        return Ok(POOL.get().cloned().unwrap_or(pool));
    }

    info!("Successfully connected to database");
    Ok(pool)
}

/// The shared pool, or `None` if [`connect`] has not succeeded.
pub fn get() -> Option<PgPool> {
    POOL.get().cloned()
}
