use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::rate_limits::{RateLimitDecision, RateLimitService};

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Identify the client a request counts against.
///
/// The socket peer wins; `X-Forwarded-For` is only consulted when the server
/// was started without connect info (tests, some proxies).
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimitService>>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);

    match limiter.check(&key) {
        RateLimitDecision::Allowed => next.run(req).await,
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, "Rate limit exceeded");

            let mut response = AppError::RateLimitExceeded(
                "Too many requests, please try again later.".to_string(),
            )
            .into_response();

            // Round up so clients never retry inside the current window
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RateLimitConfig;
    use axum::{
        body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    #[test]
    fn test_client_key_prefers_connect_info() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 7], 4242))));

        assert_eq!(client_key(&req), "192.168.1.7");
    }

    #[test]
    fn test_client_key_falls_back_to_forwarded_for() {
        let req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.5, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&req), "203.0.113.5");
    }

    #[test]
    fn test_client_key_without_any_hint() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), "unknown");
    }

    fn limited_router(max_requests: u32) -> Router {
        let limiter = Arc::new(RateLimitService::new(&RateLimitConfig {
            window: Duration::from_secs(30),
            max_requests,
        }));

        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn_with_state(limiter, rate_limit_middleware))
    }

    fn request_from(ip: &str) -> Request {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_limit_applies_per_client() {
        let app = limited_router(1);

        let first = app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        let second = app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        let other = app.oneshot(request_from("10.0.0.2")).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retry_after_is_whole_seconds_within_window() {
        let app = limited_router(1);

        app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        let limited = app.oneshot(request_from("10.0.0.1")).await.unwrap();

        let retry_after: u64 = limited
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!((1..=30).contains(&retry_after));
    }
}
