//! Blog Service
//!
//! User registration and login, token-gated post and comment creation, and a
//! public post listing. Storage sits behind the `CredentialStore` and
//! `ContentStore` traits with Postgres and in-memory implementations.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

use std::sync::Arc;

use crypto_core::TokenSigner;

pub use config::Config;
pub use error::{AppError, Result};

use db::{ContentStore, CredentialStore, MemoryStore};
use services::{AuthService, ContentService};

/// Shared per-process state handed to every handler
pub struct AppState {
    pub auth: AuthService,
    pub content: ContentService,
    pub signer: TokenSigner,
}

impl AppState {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        content: Arc<dyn ContentStore>,
        signer: TokenSigner,
    ) -> Self {
        Self {
            auth: AuthService::new(users, signer.clone()),
            content: ContentService::new(content),
            signer,
        }
    }

    /// State backed by a fresh `MemoryStore`
    pub fn in_memory(signer: TokenSigner) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, signer)
    }
}
