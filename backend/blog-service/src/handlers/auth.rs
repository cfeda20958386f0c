use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::AppState;

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let user = state.auth.register(&req.username, &req.password).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let token = state.auth.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
