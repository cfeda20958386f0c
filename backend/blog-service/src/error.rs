//! Error types for Blog Service
//!
//! Every failure is terminal for its request. Client errors carry their
//! message through; server errors are logged and answered with a generic
//! message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::db::StoreError;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body or field failed validation
    #[error("{0}")]
    Validation(String),

    /// Protected route called without a token
    #[error("Missing token")]
    MissingToken,

    /// Token failed signature or expiry checks
    #[error("Invalid token")]
    InvalidToken,

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Token was valid but its identity no longer resolves
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Username is already registered
    #[error("Username already exists")]
    DuplicateUser,

    /// Referenced resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MissingToken
            | AppError::InvalidCredentials
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateUser => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let error_msg = if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => AppError::DuplicateUser,
            StoreError::MissingReference(what) => AppError::NotFound(what),
            StoreError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<crypto_core::PasswordError> for AppError {
    fn from(err: crypto_core::PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), 400);
        assert_eq!(AppError::MissingToken.status_code(), 401);
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::InvalidToken.status_code(), 403);
        assert_eq!(AppError::NotFound("post".into()).status_code(), 404);
        assert_eq!(AppError::DuplicateUser.status_code(), 409);
        assert_eq!(AppError::Database("boom".into()).status_code(), 500);
    }

    #[actix_web::test]
    async fn test_server_error_body_is_generic() {
        let resp = AppError::Database("relation \"users\" does not exist".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(json["status"], 500);
    }

    #[actix_web::test]
    async fn test_client_error_body_keeps_message() {
        let resp = AppError::MissingToken.error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "Missing token");
        assert_eq!(json["status"], 401);
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        use validator::Validate;

        let errors = crate::models::RegisterRequest::new("al ice", "pw")
            .validate()
            .unwrap_err();
        let err = AppError::from(errors);

        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Username must not contain whitespace"));
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            AppError::from(StoreError::DuplicateUsername("alice".into())),
            AppError::DuplicateUser
        ));
        assert!(matches!(
            AppError::from(StoreError::MissingReference("post".into())),
            AppError::NotFound(_)
        ));
    }
}
