//! HTTP handlers for blog-service
//!
//! - auth: register and login
//! - posts: create (token required) and list
//! - comments: create (token required)
//! - health: liveness and store readiness

pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;

pub use auth::{login, register};
pub use comments::create_comment;
pub use health::{health_check, liveness_check};
pub use posts::{create_post, list_posts};
