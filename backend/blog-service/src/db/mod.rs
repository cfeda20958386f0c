//! Persistence boundaries for blog-service
//!
//! The credential store holds users; the content store holds posts and
//! comments. Both are traits so handlers run unchanged against Postgres in
//! production and the in-memory store in tests and local runs.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, Post, PostWithAuthor, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("referenced {0} does not exist")]
    MissingReference(String),

    #[error("{0}")]
    Database(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Fails with `DuplicateUsername` if taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a post. Fails with `MissingReference` if the author is unknown.
    async fn insert_post(&self, author_id: Uuid, title: &str, content: &str) -> StoreResult<Post>;

    /// All posts in creation order, each with its author resolved.
    async fn list_posts_with_authors(&self) -> StoreResult<Vec<PostWithAuthor>>;

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>>;

    /// Insert a comment. Fails with `MissingReference` if the post or author
    /// is unknown.
    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment>;
}
