//! Pool gauges, registered in the default registry so the service's
//! `/metrics` endpoint exports them.

use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;

lazy_static::lazy_static! {
    static ref POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "blog_db_pool_connections",
        "Connections in the database pool by state",
        &["service", "state"]
    ).expect("pool gauge registration");
}

/// Point-in-time pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub idle: u32,
    pub in_use: u32,
    pub max: u32,
}

impl PoolSnapshot {
    pub fn of(pool: &PgPool) -> Self {
        let size = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX).min(size);

        Self {
            idle,
            in_use: size - idle,
            max: pool.options().get_max_connections(),
        }
    }

    pub fn record(&self, service: &str) {
        for (state, value) in [("idle", self.idle), ("in_use", self.in_use), ("max", self.max)] {
            POOL_CONNECTIONS
                .with_label_values(&[service, state])
                .set(i64::from(value));
        }
    }
}
