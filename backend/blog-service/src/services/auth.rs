use std::sync::Arc;

use crypto_core::{hash_password, verify_password, TokenSigner};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::CredentialStore;
use crate::error::{AppError, Result};
use crate::metrics::record_auth_failure;
use crate::models::{LoginRequest, RegisterRequest, User};

/// Registration and login
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn CredentialStore>, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    /// Hash the password and store a new user.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let req = RegisterRequest::new(username, password);
        req.validate()?;
        let RegisterRequest { username, password } = req;

        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = self.users.insert_user(&username, &password_hash).await?;
        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Verify credentials and issue a signed token.
    ///
    /// An unknown username fails before any hash comparison.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let req = LoginRequest::new(username, password);
        req.validate()?;
        let LoginRequest { username, password } = req;

        let Some(user) = self.users.find_by_username(&username).await? else {
            record_auth_failure("unknown_user");
            warn!(%username, "Login rejected: unknown user");
            return Err(AppError::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await??;

        if !matches {
            record_auth_failure("wrong_password");
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .signer
            .issue(user.id, &user.username)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    /// Resolve the user a token was issued to.
    ///
    /// Looked up by the token subject; the username claim must still match
    /// the stored record.
    pub async fn resolve_author(&self, user_id: Uuid, username: &str) -> Result<User> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.username == username => Ok(user),
            _ => {
                record_auth_failure("unknown_token_subject");
                Err(AppError::Unauthorized("user no longer exists".to_string()))
            }
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.users.ping().await.map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            TokenSigner::new("unit-test-secret", 3600),
        )
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let auth = service();
        let user = auth.register("alice", "hunter2").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter2");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let auth = service();
        auth.register("alice", "one").await.unwrap();

        let err = auth.register("alice", "two").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_matching_password() {
        let auth = service();
        let user = auth.register("alice", "hunter2").await.unwrap();

        let token = auth.login("alice", "hunter2").await.unwrap();
        let claims = auth.signer.validate(&token).unwrap();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_id().unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("alice", "hunter2").await.unwrap();

        let wrong = auth.login("alice", "nope").await.unwrap_err();
        let unknown = auth.login("mallory", "hunter2").await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_resolve_author_checks_id() {
        let auth = service();
        let user = auth.register("alice", "hunter2").await.unwrap();

        assert_eq!(auth.resolve_author(user.id, "alice").await.unwrap().id, user.id);
        assert!(matches!(
            auth.resolve_author(Uuid::new_v4(), "alice").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.resolve_author(user.id, "bob").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields_before_storing() {
        let auth = service();

        for (username, password) in [("al ice", "pw"), ("   ", "pw"), ("alice", "")] {
            let err = auth.register(username, password).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{username:?}");
        }
        assert!(auth.users.find_by_username("al ice").await.unwrap().is_none());

        let long = "x".repeat(crate::validators::MAX_PASSWORD_BYTES + 1);
        assert!(matches!(
            auth.register("alice", &long).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_trims_username() {
        let auth = service();
        let user = auth.register("  alice ", "hunter2").await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(auth.login("alice", "hunter2").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let auth = service();
        assert!(matches!(
            auth.login("", "pw").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            auth.login("alice", "").await,
            Err(AppError::Validation(_))
        ));
    }
}
