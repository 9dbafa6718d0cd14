use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::items::handlers;
use crate::features::items::services::ItemService;

/// Create routes for the items feature
pub fn routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route("/item/items", get(handlers::list_items))
        .route(
            "/item/create",
            get(handlers::create_item_form).post(handlers::create_item),
        )
        .route("/item/{id}", get(handlers::item_details))
        .route(
            "/item/{id}/delete",
            get(handlers::delete_item_form).post(handlers::delete_item),
        )
        .route(
            "/item/{id}/update",
            get(handlers::update_item_form).post(handlers::update_item),
        )
        .with_state(service)
}
