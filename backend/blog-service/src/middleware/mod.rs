//! Token gate for protected routes
//!
//! The `authorization` header carries the raw token. A missing or empty
//! header is rejected with 401; anything that fails signature or expiry
//! checks is rejected with 403. On success the decoded identity is placed in
//! the request extensions for the `AuthUser` extractor.

use std::future::{ready, Ready};

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::{JwtError, TokenSigner};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::record_auth_failure;

/// Identity decoded from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::MissingToken),
        )
    }
}

/// Check the `authorization` header against the signer.
pub fn authenticate(signer: &TokenSigner, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let raw = match headers.get(AUTHORIZATION) {
        None => {
            record_auth_failure("missing_token");
            return Err(AppError::MissingToken);
        }
        Some(value) => value.to_str().map_err(|_| {
            record_auth_failure("malformed_header");
            AppError::InvalidToken
        })?,
    };

    if raw.trim().is_empty() {
        record_auth_failure("missing_token");
        return Err(AppError::MissingToken);
    }

    let claims = signer.validate(raw).map_err(|e| {
        let reason = match e {
            JwtError::Expired => "token_expired",
            _ => "token_invalid",
        };
        record_auth_failure(reason);
        tracing::warn!(%reason, "Rejected token");
        AppError::InvalidToken
    })?;

    let user_id = claims.user_id().map_err(|_| {
        record_auth_failure("token_invalid");
        AppError::InvalidToken
    })?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
    })
}

/// Middleware that rejects requests without a valid token
#[derive(Clone)]
pub struct TokenGate {
    signer: TokenSigner,
}

impl TokenGate {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGateService {
            service,
            signer: self.signer.clone(),
        }))
    }
}

pub struct TokenGateService<S> {
    service: S,
    signer: TokenSigner,
}

impl<S, B> Service<ServiceRequest> for TokenGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&self.signer, req.headers()) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let res = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::{Duration, Utc};

    const SECRET: &str = "middleware-test-secret";

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().body(user.username)
    }

    fn signer() -> TokenSigner {
        TokenSigner::new(SECRET, 3600)
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(TokenGate::new(signer()))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let token = signer().issue(Uuid::new_v4(), "alice").unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "alice");
    }

    #[actix_web::test]
    async fn test_missing_and_empty_header_are_401() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(TokenGate::new(signer()))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(resp.status(), 401);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, ""))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[::core::prelude::v1::test]
    fn test_bearer_prefix_is_not_stripped() {
        let token = signer().issue(Uuid::new_v4(), "alice").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );

        assert!(matches!(
            authenticate(&signer(), &headers),
            Err(AppError::InvalidToken)
        ));
    }

    #[::core::prelude::v1::test]
    fn test_expired_and_foreign_tokens_are_invalid() {
        let expired = signer()
            .issue_at(Uuid::new_v4(), "alice", Utc::now() - Duration::hours(2))
            .unwrap();
        let foreign = TokenSigner::new("some-other-secret", 3600)
            .issue(Uuid::new_v4(), "alice")
            .unwrap();

        for token in [expired, foreign] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, token.parse().unwrap());
            assert!(matches!(
                authenticate(&signer(), &headers),
                Err(AppError::InvalidToken)
            ));
        }
    }

    #[actix_web::test]
    async fn test_extractor_without_gate_is_401() {
        let app = test::init_service(App::new().route("/open", web::get().to(whoami))).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/open").to_request()).await;
        assert_eq!(resp.status(), 401);
    }
}
