//! Blog CMS
//!
//! Workspace facade over the service crates. The HTTP service lives in
//! `blog-service`, shared cryptography in `crypto-core`, and the standalone
//! sales report in `sales-report`.

pub use blog_service::{self, AppState, Config};
pub use crypto_core::{self, TokenSigner};
pub use sales_report::{self, summarize, SaleRecord, SalesSummary};
