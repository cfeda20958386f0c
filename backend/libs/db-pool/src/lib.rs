//! PostgreSQL pool for the blog service
//!
//! `create_pool` opens the pool; `PoolMonitor` keeps the pool gauges fresh
//! until the server shuts it down.

pub mod env_utils;
mod metrics;

use std::fmt;
use std::time::Duration;

use env_utils::parse_env_with_default;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use metrics::PoolSnapshot;

/// Pool sizing and timeouts, read from `DB_*` variables
#[derive(Clone)]
pub struct DbConfig {
    /// `service` label on the pool gauges
    pub service_name: String,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Bounds both the initial connect and every later checkout
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// How often `PoolMonitor` refreshes the gauges
    pub metrics_interval: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .field("metrics_interval", &self.metrics_interval)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: "blog-service".to_string(),
            database_url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            metrics_interval: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// `database_url` comes from the caller, which owns `DATABASE_URL`.
    pub fn from_env(service_name: &str, database_url: &str) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            Duration::from_secs(parse_env_with_default(key, fallback.as_secs()))
        };

        let max_connections =
            parse_env_with_default("DB_MAX_CONNECTIONS", defaults.max_connections).max(1);
        let min_connections = parse_env_with_default("DB_MIN_CONNECTIONS", defaults.min_connections)
            .min(max_connections);

        Self {
            service_name: service_name.to_string(),
            database_url: database_url.to_string(),
            max_connections,
            min_connections,
            acquire_timeout: secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout),
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout),
            max_lifetime: secs("DB_MAX_LIFETIME_SECS", defaults.max_lifetime),
            metrics_interval: secs("DB_METRICS_INTERVAL_SECS", defaults.metrics_interval)
                .max(Duration::from_secs(1)),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .test_before_acquire(true)
    }
}

/// Connect and seed the pool gauges.
///
/// `connect` opens a first connection before returning, so an unreachable
/// database fails here within `acquire_timeout`.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(?config, "Connecting to PostgreSQL");

    let pool = config.pool_options().connect(&config.database_url).await?;
    PoolSnapshot::of(&pool).record(&config.service_name);

    info!(
        service = %config.service_name,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool ready"
    );
    Ok(pool)
}

/// Background refresher for the pool gauges.
///
/// Stops when `shutdown` is called, when the monitor is dropped, or once the
/// pool is closed.
pub struct PoolMonitor {
    handle: Option<JoinHandle<()>>,
}

impl PoolMonitor {
    pub fn spawn(pool: PgPool, service_name: &str, every: Duration) -> Self {
        let service_name = service_name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every);
            loop {
                ticks.tick().await;
                if pool.is_closed() {
                    debug!(service = %service_name, "Pool closed; pool monitor exiting");
                    break;
                }
                PoolSnapshot::of(&pool).record(&service_name);
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop refreshing and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Pool monitor ended abnormally");
                }
            }
        }
    }
}

impl Drop for PoolMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
