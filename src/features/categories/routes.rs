use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Static segments (`categories`, `create`) take precedence over `{id}`.
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/category/categories", get(handlers::list_categories))
        .route(
            "/category/create",
            get(handlers::create_category_form).post(handlers::create_category),
        )
        .route("/category/{id}", get(handlers::category_details))
        .route(
            "/category/{id}/delete",
            get(handlers::delete_category_form).post(handlers::delete_category),
        )
        .route(
            "/category/{id}/update",
            get(handlers::update_category_form).post(handlers::update_category),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    use crate::features::categories::models::NewCategory;
    use crate::features::items::models::NewItem;
    use crate::shared::test_helpers::{test_server, InMemoryInventory};

    fn tools() -> NewCategory {
        NewCategory {
            name: "Tools".to_string(),
            description: "Hand tools".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_redirects_to_list() {
        let store = InMemoryInventory::new();
        let server = test_server(&store);

        let response = server
            .post("/category/create")
            .form(&[("name", "  Tools "), ("description", "Hand tools")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", "/category/categories");
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_uses_byte_order() {
        let store = InMemoryInventory::new();
        for name in ["apple", "Banana", "_misc"] {
            store
                .insert_category(&NewCategory {
                    name: name.to_string(),
                    description: "Sample category".to_string(),
                })
                .await;
        }
        let server = test_server(&store);

        let body = server.get("/category/categories").await.text();

        let banana = body.find(">Banana<").expect("Banana missing");
        let misc = body.find(">_misc<").expect("_misc missing");
        let apple = body.find(">apple<").expect("apple missing");
        assert!(banana < misc && misc < apple);
    }

    #[tokio::test]
    async fn test_create_with_short_name_rerenders_form() {
        let store = InMemoryInventory::new();
        let server = test_server(&store);

        let response = server
            .post("/category/create")
            .form(&[("name", "ab"), ("description", "Hand tools")])
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Category name must contain between 3 and 100 characters"));
        assert!(body.contains("value=\"ab\""));
        assert_eq!(store.category_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_escapes_markup() {
        let store = InMemoryInventory::new();
        let server = test_server(&store);

        server
            .post("/category/create")
            .form(&[("name", "<b>Tools</b>"), ("description", "Hand tools")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let body = server.get("/category/categories").await.text();
        assert!(body.contains("&lt;b&gt;Tools&lt;&#x2F;b&gt;"));
        assert!(!body.contains("<b>Tools</b>"));
    }

    #[tokio::test]
    async fn test_max_length_input_with_markup_is_stored() {
        let store = InMemoryInventory::new();
        let server = test_server(&store);
        let name = format!("{}R&D", "a".repeat(97));
        let description = "'".repeat(500);

        let response = server
            .post("/category/create")
            .form(&[("name", name.as_str()), ("description", description.as_str())])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", "/category/categories");
        assert_eq!(store.category_count().await, 1);
        let body = server.get("/category/categories").await.text();
        assert!(body.contains(&format!("{}R&amp;D", "a".repeat(97))));
    }

    #[tokio::test]
    async fn test_update_to_fully_escaped_name_is_stored() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        let server = test_server(&store);
        let name = "\"".repeat(100);

        let response = server
            .post(&format!("{}/update", category.url()))
            .form(&[("name", name.as_str()), ("description", "Hand tools")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let body = server.get(&category.url()).await.text();
        assert!(body.contains(&"&quot;".repeat(100)));
    }

    #[tokio::test]
    async fn test_duplicate_name_redirects_to_existing() {
        let store = InMemoryInventory::new();
        let existing = store.insert_category(&tools()).await;
        let server = test_server(&store);

        let response = server
            .post("/category/create")
            .form(&[("name", "Tools"), ("description", "Something else")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", existing.url());
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_detail_lists_category_items() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        store
            .insert_item(&NewItem {
                name: "Hammer".to_string(),
                description: "Claw hammer".to_string(),
                category_id: category.id,
                price: Decimal::new(999, 2),
                number_in_stock: 5,
            })
            .await;
        let server = test_server(&store);

        let response = server.get(&category.url()).await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Hand tools"));
        assert!(body.contains("Hammer"));
    }

    #[tokio::test]
    async fn test_delete_refused_while_items_remain() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        store
            .insert_item(&NewItem {
                name: "Hammer".to_string(),
                description: "Claw hammer".to_string(),
                category_id: category.id,
                price: Decimal::new(999, 2),
                number_in_stock: 5,
            })
            .await;
        let server = test_server(&store);

        let response = server
            .post(&format!("{}/delete", category.url()))
            .form(&[("id", category.id.to_string())])
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Delete the following items"));
        assert!(body.contains("Hammer"));
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        let server = test_server(&store);

        let response = server
            .post(&format!("{}/delete", category.url()))
            .form(&[("id", category.id.to_string())])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", "/category/categories");
        server
            .get(&category.url())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_form_for_missing_category_redirects() {
        let server = test_server(&InMemoryInventory::new());

        let response = server
            .get(&format!("/category/{}/delete", uuid::Uuid::new_v4()))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", "/category/categories");
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id_is_not_found() {
        let server = test_server(&InMemoryInventory::new());

        server
            .get(&format!("/category/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/category/not-an-id")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/category/not-an-id/update")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_form_is_prefilled() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        let server = test_server(&store);

        let response = server.get(&format!("{}/update", category.url())).await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Update Category"));
        assert!(body.contains("value=\"Tools\""));
    }

    #[tokio::test]
    async fn test_update_redirects_to_detail() {
        let store = InMemoryInventory::new();
        let category = store.insert_category(&tools()).await;
        let server = test_server(&store);

        let response = server
            .post(&format!("{}/update", category.url()))
            .form(&[("name", "Power Tools"), ("description", "Cordless tools")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", category.url());
        let body = server.get(&category.url()).await.text();
        assert!(body.contains("Power Tools"));
    }

    #[tokio::test]
    async fn test_update_to_taken_name_shows_error() {
        let store = InMemoryInventory::new();
        store.insert_category(&tools()).await;
        let garden = store
            .insert_category(&NewCategory {
                name: "Garden".to_string(),
                description: "Garden supplies".to_string(),
            })
            .await;
        let server = test_server(&store);

        let response = server
            .post(&format!("{}/update", garden.url()))
            .form(&[("name", "Tools"), ("description", "Garden supplies")])
            .await;

        response.assert_status_ok();
        assert!(response
            .text()
            .contains("Another category already uses this name"));
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let server = test_server(&InMemoryInventory::new());

        server
            .post(&format!("/category/{}/update", uuid::Uuid::new_v4()))
            .form(&[("name", "Tools"), ("description", "Hand tools")])
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
