//! Shared setup for the end-to-end suites
//!
//! Every test gets its own in-memory `AppState`, so suites can run in
//! parallel without a database.

use actix_web::web;
use blog_cms::{AppState, TokenSigner};

pub const TEST_SECRET: &str = "e2e-test-signing-secret";

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory(TokenSigner::new(TEST_SECRET, 3600)))
}

/// Build the full blog-service app around a state
macro_rules! blog_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(move |cfg| blog_cms::blog_service::routes::configure(cfg, state)),
        )
        .await
    }};
}

/// POST a JSON body, optionally with a raw `authorization` header
macro_rules! send_json {
    ($app:expr, $uri:expr, $body:expr) => {
        actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request(),
        )
        .await
    };
    ($app:expr, $uri:expr, $body:expr, $token:expr) => {
        actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri($uri)
                .insert_header(("authorization", $token))
                .set_json($body)
                .to_request(),
        )
        .await
    };
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri($uri).to_request(),
        )
        .await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}
