use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::config::{Config, StorageBackend};
use blog_service::db::{MemoryStore, PgStore};
use blog_service::metrics::MetricsMiddleware;
use blog_service::{routes, AppState};
use crypto_core::TokenSigner;
use db_pool::{create_pool, DbConfig, PoolMonitor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// The monitor is `Some` only for the Postgres backend.
async fn build_state(config: &Config) -> anyhow::Result<(AppState, Option<PoolMonitor>)> {
    let signer = TokenSigner::new(&config.jwt.secret, config.jwt.ttl_secs);

    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            Ok((AppState::new(store.clone(), store, signer), None))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let db_config = DbConfig::from_env("blog-service", url);
            let pool = create_pool(&db_config)
                .await
                .context("Failed to connect to PostgreSQL")?;

            let store = Arc::new(PgStore::new(pool.clone()));
            store.migrate().await.context("Failed to run migrations")?;

            let monitor =
                PoolMonitor::spawn(pool, &db_config.service_name, db_config.metrics_interval);

            Ok((AppState::new(store.clone(), store, signer), Some(monitor)))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        env = %config.app.env,
        storage = ?config.storage.backend,
        "Configuration loaded"
    );

    let (state, pool_monitor) = build_state(&config).await?;
    let state = web::Data::new(state);
    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let allowed_origins = config.cors.allowed_origins.clone();

    tracing::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &allowed_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        let cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let state = state.clone();
        App::new()
            .wrap(MetricsMiddleware)
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| routes::configure(cfg, state))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server error")?;

    if let Some(monitor) = pool_monitor {
        monitor.shutdown().await;
    }

    tracing::info!("blog-service stopped");
    Ok(())
}
