use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreatePostRequest, PostCreatedResponse};
use crate::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let author = state
        .auth
        .resolve_author(user.user_id, &user.username)
        .await?;
    let post = state
        .content
        .create_post(&author, &req.title, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(PostCreatedResponse {
        message: "Post created successfully".to_string(),
        post,
    }))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.content.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}
