use actix_web::{guard, http::header, web, HttpRequest, HttpResponse, Resource};

use crate::error::AppError;
use crate::handlers;
use crate::metrics::serve_metrics;
use crate::middleware::TokenGate;
use crate::AppState;

fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid request body: {err}")).into()
}

/// Catch-all for a path whose real routes are method-guarded resources, so an
/// unsupported method gets 405 before any token check.
fn method_not_allowed(path: &str, allow: &'static str) -> Resource {
    web::resource(path).to(move || async move {
        HttpResponse::MethodNotAllowed()
            .insert_header((header::ALLOW, allow))
            .finish()
    })
}

/// Register shared state and every route served by blog-service.
///
/// Only the write endpoints for posts and comments sit behind the token gate;
/// listing posts stays public.
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let gate = TokenGate::new(state.signer.clone());

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/api")
                .route("/register", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .service(
                    web::resource("/posts")
                        .guard(guard::Post())
                        .wrap(gate.clone())
                        .route(web::post().to(handlers::create_post)),
                )
                .route("/posts", web::get().to(handlers::list_posts))
                .service(method_not_allowed("/posts", "GET, POST"))
                .service(
                    web::resource("/comments")
                        .guard(guard::Post())
                        .wrap(gate)
                        .route(web::post().to(handlers::create_comment)),
                )
                .service(method_not_allowed("/comments", "POST"))
                .route("/health", web::get().to(handlers::health_check))
                .route("/health/live", web::get().to(handlers::liveness_check)),
        );
}
