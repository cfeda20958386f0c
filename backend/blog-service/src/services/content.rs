use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::models::{
    AuthorSummary, Comment, CreateCommentRequest, CreatePostRequest, PostWithAuthor, User,
};

/// Posts and comments
#[derive(Clone)]
pub struct ContentService {
    content: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    pub async fn create_post(
        &self,
        author: &User,
        title: &str,
        content: &str,
    ) -> Result<PostWithAuthor> {
        let req = CreatePostRequest::new(title, content);
        req.validate()?;

        let post = self
            .content
            .insert_post(author.id, &req.title, &req.content)
            .await?;
        info!(post_id = %post.id, author_id = %author.id, "Post created");

        Ok(PostWithAuthor::new(post, AuthorSummary::from(author)))
    }

    /// Every post in creation order, authors resolved
    pub async fn list_posts(&self) -> Result<Vec<PostWithAuthor>> {
        Ok(self.content.list_posts_with_authors().await?)
    }

    pub async fn create_comment(
        &self,
        author: &User,
        post_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let req = CreateCommentRequest::new(post_id, content);
        req.validate()?;

        if self.content.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {post_id}")));
        }

        let comment = self
            .content
            .insert_comment(post_id, author.id, &req.content)
            .await?;
        info!(comment_id = %comment.id, %post_id, author_id = %author.id, "Comment created");

        Ok(comment)
    }
}
