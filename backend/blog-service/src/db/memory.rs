//! In-process store backing both traits
//!
//! Used by the test suites and by `STORAGE_BACKEND=memory`. State lives for
//! the life of the process.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContentStore, CredentialStore, StoreError, StoreResult};
use crate::models::{AuthorSummary, Comment, Post, PostWithAuthor, User};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    usernames: HashMap<String, Uuid>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.usernames.contains_key(username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        inner.usernames.insert(user.username.clone(), user.id);
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;

        Ok(inner
            .usernames
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert_post(&self, author_id: Uuid, title: &str, content: &str) -> StoreResult<Post> {
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&author_id) {
            return Err(StoreError::MissingReference("author".to_string()));
        }

        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            created_at: Utc::now(),
        };
        inner.posts.push(post.clone());

        Ok(post)
    }

    async fn list_posts_with_authors(&self) -> StoreResult<Vec<PostWithAuthor>> {
        let inner = self.inner.read().await;

        inner
            .posts
            .iter()
            .map(|post| {
                let author = inner.users.get(&post.author_id).ok_or_else(|| {
                    StoreError::Database(format!("post {} has a dangling author", post.id))
                })?;
                Ok(PostWithAuthor::new(post.clone(), AuthorSummary::from(author)))
            })
            .collect()
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment> {
        let mut inner = self.inner.write().await;

        if !inner.posts.iter().any(|p| p.id == post_id) {
            return Err(StoreError::MissingReference("post".to_string()));
        }
        if !inner.users.contains_key(&author_id) {
            return Err(StoreError::MissingReference("author".to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author_id,
            post_id,
            created_at: Utc::now(),
        };
        inner.comments.push(comment.clone());

        Ok(comment)
    }
}
