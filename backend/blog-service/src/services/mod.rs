//! Business logic for blog-service
//!
//! Handlers stay thin: they deserialize, call a service, and shape the
//! response. Services own validation and talk to the stores through traits.

pub mod auth;
pub mod content;

pub use auth::AuthService;
pub use content::ContentService;
