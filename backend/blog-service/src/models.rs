//! Data models for blog-service
//!
//! - User: credential record (never serialized to clients)
//! - Post / Comment: content records referencing their author
//! - PostWithAuthor: the listing shape with the author resolved

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validators::trimmed;

/// Stored credential. Deliberately not `Serialize`: the hash must not leave
/// the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Public identity of an author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
}

impl PostWithAuthor {
    pub fn new(post: Post, author: AuthorSummary) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author,
            created_at: post.created_at,
        }
    }
}

// =====================================================================
// Request / response bodies
// =====================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1 to 64 characters"),
        custom(function = "crate::validators::validate_username_shape")
    )]
    pub username: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "crate::validators::validate_password_size")
    )]
    pub password: String,
}

impl RegisterRequest {
    /// Username is trimmed; the password is kept byte for byte.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: trimmed(username),
            password: password.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: trimmed(username),
            password: password.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 20000,
        message = "Content must be 1 to 20000 characters"
    ))]
    pub content: String,
}

impl CreatePostRequest {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: trimmed(title),
            content: trimmed(content),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(rename = "postId", alias = "post_id")]
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Content must be 1 to 5000 characters"))]
    pub content: String,
}

impl CreateCommentRequest {
    pub fn new(post_id: Uuid, content: &str) -> Self {
        Self {
            post_id,
            content: trimmed(content),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub message: String,
    pub post: PostWithAuthor,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub comment: Comment,
}
