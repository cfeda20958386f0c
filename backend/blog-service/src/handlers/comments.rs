use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CommentCreatedResponse, CreateCommentRequest};
use crate::AppState;

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let author = state
        .auth
        .resolve_author(user.user_id, &user.username)
        .await?;
    let comment = state
        .content
        .create_comment(&author, req.post_id, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        message: "Comment created successfully".to_string(),
        comment,
    }))
}
