//! Shared cryptography for the blog CMS
//!
//! - `jwt`: HS256 session tokens issued at login and checked by the token gate
//! - `password`: Argon2id hashing and verification for stored credentials
//! - `secret`: strength checks for the shared JWT signing secret

pub mod jwt;
pub mod password;
pub mod secret;

pub use jwt::{Claims, JwtError, TokenSigner, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password, PasswordError};
pub use secret::{validate_secret_strength, SecretStrength};
