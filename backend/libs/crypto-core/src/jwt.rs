//! Session tokens for the blog CMS
//!
//! Tokens are HS256-signed JWTs carrying the user's id (`sub`) and username.
//! They are issued by the authenticator at login and checked by the token
//! gate on every protected request.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::TokenSigner;
//! use uuid::Uuid;
//!
//! let signer = TokenSigner::new("a-long-and-random-shared-secret", 3600);
//! let token = signer.issue(Uuid::new_v4(), "alice").unwrap();
//! let claims = signer.validate(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Default token lifetime when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest lifetime configuration will accept (30 days).
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Tokens are signed with a shared secret; nothing else is accepted on decode.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Username the token was issued to
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::Invalid(format!("bad subject: {e}")))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

// ============================================================================
// Signer
// ============================================================================

/// Issues and validates session tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenSigner {
    /// A TTL too large for `chrono::Duration` saturates; `issue` then fails
    /// with `JwtError::Signing` rather than minting a token.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or_else(Duration::max_value),
        }
    }

    /// Issue a token for `username`, valid from now for the configured TTL.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, JwtError> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| JwtError::Signing("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// `token` is the raw compact JWT; no scheme prefix is stripped.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
