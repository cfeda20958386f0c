//! Known Issues Regression Tests
//!
//! Purpose: Lock in behaviour around auth and content edge cases that
//! naive implementations get wrong
//! Coverage:
//! 1. Login as an unknown user fails cleanly with 401 (no fall-through)
//! 2. Usernames are unique (409 on re-registration)
//! 3. Password hashes never appear in any response body
//! 4. Tokens are taken raw: a `Bearer ` prefix is rejected with 403
//! 5. Missing vs invalid tokens are distinguished (401 vs 403)
//! 6. Comments cannot reference a nonexistent post (404)
//!
//! Run: cargo test --test known_issues_regression_test

use actix_web::test;
use blog_cms::TokenSigner;
use serde_json::{json, Value};
use uuid::Uuid;

#[macro_use]
mod test_harness;
use test_harness::{test_state, TEST_SECRET};

#[actix_web::test]
async fn test_unknown_user_login_is_401_not_500() {
    let app = blog_app!(test_state());

    let resp = send_json!(app, "/api/login", json!({"username": "nobody", "password": "pw"}));
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid username or password", "status": 401}));
}

#[actix_web::test]
async fn test_reregistering_username_is_rejected() {
    let app = blog_app!(test_state());

    let resp = send_json!(app, "/api/register", json!({"username": "dup", "password": "one"}));
    assert_eq!(resp.status(), 201);

    let resp = send_json!(app, "/api/register", json!({"username": "dup", "password": "two"}));
    assert_eq!(resp.status(), 409);

    // The original password still works; the second registration changed nothing
    let resp = send_json!(app, "/api/login", json!({"username": "dup", "password": "one"}));
    assert_eq!(resp.status(), 200);
    let resp = send_json!(app, "/api/login", json!({"username": "dup", "password": "two"}));
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_password_hash_never_serialized() {
    let app = blog_app!(test_state());
    let creds = json!({"username": "leaky", "password": "pw"});

    let register = send_json!(app, "/api/register", &creds);
    let register = test::read_body(register).await;
    let login = send_json!(app, "/api/login", &creds);
    let login: Value = test::read_body_json(login).await;
    let token = login["token"].as_str().unwrap().to_string();

    let post = send_json!(
        app,
        "/api/posts",
        json!({"title": "t", "content": "c"}),
        token
    );
    let post = test::read_body(post).await;

    let list = actix_web::test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts").to_request(),
    )
    .await;
    let list = test::read_body(list).await;

    for body in [register, post, list] {
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("password"), "{text}");
        assert!(!text.contains("$argon2"), "{text}");
    }
}

#[actix_web::test]
async fn test_bearer_prefix_is_not_accepted() {
    let state = test_state();
    let app = blog_app!(state);
    let creds = json!({"username": "bearer", "password": "pw"});
    send_json!(app, "/api/register", &creds);
    let resp = send_json!(app, "/api/login", &creds);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let resp = send_json!(
        app,
        "/api/posts",
        json!({"title": "t", "content": "c"}),
        format!("Bearer {token}")
    );
    assert_eq!(resp.status(), 403);

    let resp = send_json!(app, "/api/posts", json!({"title": "t", "content": "c"}), token);
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn test_missing_and_invalid_tokens_are_distinguished() {
    let app = blog_app!(test_state());
    let body = json!({"title": "t", "content": "c"});

    assert_eq!(send_json!(app, "/api/posts", &body).status(), 401);
    assert_eq!(send_json!(app, "/api/posts", &body, "").status(), 401);
    assert_eq!(send_json!(app, "/api/posts", &body, "not-a-jwt").status(), 403);

    let foreign = TokenSigner::new("a-different-secret", 3600)
        .issue(Uuid::new_v4(), "someone")
        .unwrap();
    assert_eq!(send_json!(app, "/api/posts", &body, foreign).status(), 403);

    // Same secret, so the signature checks out and the token is only rejected
    // once the subject fails to resolve
    let orphan = TokenSigner::new(TEST_SECRET, 3600)
        .issue(Uuid::new_v4(), "someone")
        .unwrap();
    assert_eq!(send_json!(app, "/api/posts", &body, orphan).status(), 401);
}

#[actix_web::test]
async fn test_comment_on_missing_post_is_404() {
    let app = blog_app!(test_state());
    let creds = json!({"username": "commenter", "password": "pw"});
    send_json!(app, "/api/register", &creds);
    let resp = send_json!(app, "/api/login", &creds);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let resp = send_json!(
        app,
        "/api/comments",
        json!({"postId": Uuid::new_v4(), "content": "hello?"}),
        token
    );
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}
