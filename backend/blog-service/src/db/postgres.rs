use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{ContentStore, CredentialStore, StoreError, StoreResult};
use crate::models::{AuthorSummary, Comment, Post, PostWithAuthor, User};

/// Postgres-backed store for users, posts and comments
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        tracing::debug!("Running blog-service database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Unique constraint on `users.username`, named in the initial migration
const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// Translate constraint violations into store errors; everything else is opaque.
///
/// `username` is set only for user inserts; other unique violations stay
/// database errors.
fn map_sqlx_error(err: sqlx::Error, username: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(mapped) = classify_violation(db_err.kind(), db_err.constraint(), username) {
            return mapped;
        }
    }

    StoreError::Database(err.to_string())
}

fn classify_violation(
    kind: ErrorKind,
    constraint: Option<&str>,
    username: Option<&str>,
) -> Option<StoreError> {
    match (kind, constraint, username) {
        (ErrorKind::UniqueViolation, Some(USERNAME_UNIQUE_CONSTRAINT), Some(name)) => {
            Some(StoreError::DuplicateUsername(name.to_string()))
        }
        (ErrorKind::ForeignKeyViolation, constraint, _) => {
            let what = match constraint {
                Some(c) if c.contains("post_id") => "post",
                _ => "author",
            };
            Some(StoreError::MissingReference(what.to_string()))
        }
        _ => None,
    }
}

fn db_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[derive(FromRow)]
struct PostAuthorRow {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_username: String,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(row: PostAuthorRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: AuthorSummary {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, Some(username)))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(db_error)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn insert_post(&self, author_id: Uuid, title: &str, content: &str) -> StoreResult<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, author_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, None))
    }

    async fn list_posts_with_authors(&self) -> StoreResult<Vec<PostWithAuthor>> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(
            r#"
            SELECT p.id, p.title, p.content, p.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at ASC, p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, content, author_id, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, content, author_id, post_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, author_id, post_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(content)
        .bind(author_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, None))
    }
}
