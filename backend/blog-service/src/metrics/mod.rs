//! Prometheus metrics for blog-service
//!
//! Request counters are labelled with the matched route pattern rather than
//! the raw path so ids do not explode label cardinality.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header::ContentType, Error, HttpResponse};
use futures::future::LocalBoxFuture;
use prometheus::{Encoder, HistogramVec, IntCounterVec, TextEncoder};

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "blog_http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    ).unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "blog_http_request_duration_seconds",
        "HTTP request latency",
        &["method", "path", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap();

    pub static ref AUTH_FAILURES_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "blog_auth_failures_total",
        "Rejected logins and token checks",
        &["reason"]
    ).unwrap();
}

pub fn record_auth_failure(reason: &str) {
    AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

/// Records request count and latency per route
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await?;

            let path = res
                .request()
                .match_pattern()
                .unwrap_or_else(|| "unmatched".to_string());
            let status = res.status().as_u16().to_string();
            let labels = [method.as_str(), path.as_str(), status.as_str()];

            HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&labels)
                .observe(start.elapsed().as_secs_f64());

            Ok(res)
        })
    }
}

/// GET /metrics
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_metrics_endpoint_exposes_request_counter() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsMiddleware)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/metrics", web::get().to(serve_metrics)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(resp.status().is_success());

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("blog_http_requests_total"));
        assert!(text.contains("path=\"/ping\""));
    }

    #[::core::prelude::v1::test]
    fn test_record_auth_failure_increments() {
        let before = AUTH_FAILURES_TOTAL.with_label_values(&["unit_test"]).get();
        record_auth_failure("unit_test");
        assert_eq!(
            AUTH_FAILURES_TOTAL.with_label_values(&["unit_test"]).get(),
            before + 1
        );
    }
}
