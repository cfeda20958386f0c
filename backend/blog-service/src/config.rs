//! Configuration for blog-service
//!
//! Loaded from environment variables (a `.env` file is honoured by `main`).
//! Production refuses an unset or weak JWT secret and a wildcard CORS origin.

use std::env;
use std::str::FromStr;

use crypto_core::{
    validate_secret_strength, SecretStrength, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS,
};
use thiserror::Error;

/// Signing key accepted outside production when JWT_SECRET is unset
pub const DEV_JWT_SECRET: &str = "secret-key";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("insecure configuration: {0}")]
    Insecure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// development, staging, production
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Required for the postgres backend
    pub database_url: Option<String>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let app = AppConfig {
            env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
            host: var("BLOG_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var("BLOG_SERVICE_PORT", DEFAULT_PORT)?,
        };
        let production = app.is_production();

        let cors = {
            let raw = match var("CORS_ALLOWED_ORIGINS") {
                Some(value) => value,
                None if production => return Err(ConfigError::Missing("CORS_ALLOWED_ORIGINS")),
                None => DEFAULT_CORS_ORIGIN.to_string(),
            };
            let allowed_origins: Vec<String> = raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();

            if production && allowed_origins.iter().any(|o| o == "*") {
                return Err(ConfigError::Insecure(
                    "CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string(),
                ));
            }
            CorsConfig { allowed_origins }
        };

        let storage = {
            let backend = match var("STORAGE_BACKEND") {
                None => StorageBackend::Postgres,
                Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: raw,
                })?,
            };
            let database_url = var("DATABASE_URL");
            if backend == StorageBackend::Postgres && database_url.is_none() {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
            StorageConfig {
                backend,
                database_url,
            }
        };

        let jwt = {
            let secret = match var("JWT_SECRET") {
                Some(secret) => secret,
                None if production => return Err(ConfigError::Missing("JWT_SECRET")),
                None => {
                    tracing::warn!("JWT_SECRET not set; using the development signing key");
                    DEV_JWT_SECRET.to_string()
                }
            };

            match validate_secret_strength(&secret) {
                SecretStrength::Weak if production => {
                    return Err(ConfigError::Insecure(
                        "JWT_SECRET is too weak for production".to_string(),
                    ))
                }
                SecretStrength::Weak => {
                    tracing::warn!("JWT_SECRET is weak; acceptable only for development")
                }
                SecretStrength::Acceptable | SecretStrength::Strong => {}
            }

            let ttl_secs = parse_var("JWT_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
            if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
                return Err(ConfigError::Invalid {
                    key: "JWT_TTL_SECS",
                    value: ttl_secs.to_string(),
                });
            }
            JwtConfig { secret, ttl_secs }
        };

        Ok(Config {
            app,
            cors,
            storage,
            jwt,
        })
    }
}
