use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::error::AppError;
use crate::core::middleware;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::items::{routes as items_routes, ItemService};
use crate::features::rate_limits::RateLimitService;
use crate::shared::constants::CATEGORY_LIST_PATH;
use crate::shared::views;

/// Everything the router hands to handlers and middleware
pub struct AppServices {
    pub category_service: Arc<CategoryService>,
    pub item_service: Arc<ItemService>,
    pub rate_limiter: Arc<RateLimitService>,
}

async fn home() -> Redirect {
    Redirect::to(CATEGORY_LIST_PATH)
}

async fn not_found() -> Response {
    match views::render_not_found_page() {
        Ok(page) => (StatusCode::NOT_FOUND, page).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Build the application router with the full middleware stack
pub fn build_router(services: AppServices, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home))
        .merge(categories_routes::routes(services.category_service))
        .merge(items_routes::routes(services.item_service))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(from_fn_with_state(
            services.rate_limiter,
            middleware::rate_limit_middleware,
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
