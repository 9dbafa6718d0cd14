use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppForm, EntityId};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::items::dtos::{ItemFormDto, ItemResponseDto};
use crate::features::items::models::NewItem;
use crate::features::items::services::ItemService;
use crate::shared::constants::ITEM_LIST_PATH;
use crate::shared::validation::FieldError;
use crate::shared::views;

const CREATE_TITLE: &str = "Create Item";
const UPDATE_TITLE: &str = "Update Item";

/// Render the item form with a fresh category list for the select control
async fn render_form(
    service: &ItemService,
    title: &str,
    form: &ItemFormDto,
    errors: &[FieldError],
) -> Result<Html<String>> {
    let categories: Vec<CategoryResponseDto> = service
        .categories()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(views::render(
        "item_form.html",
        context! { title => title, categories, item => form, errors => errors },
    )?)
}

/// Sanitize the submission and check that its category exists
async fn parse_submission(
    service: &ItemService,
    form: ItemFormDto,
) -> Result<(ItemFormDto, std::result::Result<NewItem, Vec<FieldError>>)> {
    let (form, parsed) = form.sanitize();

    let parsed = match parsed {
        Ok(new) => {
            if service.category_exists(new.category_id).await? {
                Ok(new)
            } else {
                Err(vec![FieldError::new(
                    "category",
                    "Selected category does not exist.",
                )])
            }
        }
        Err(errors) => Err(errors),
    };

    Ok((form, parsed))
}

/// List all items with their categories
pub async fn list_items(State(service): State<Arc<ItemService>>) -> Result<Html<String>> {
    let items: Vec<ItemResponseDto> = service
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(views::render(
        "item_list.html",
        context! { title => "Items List", items },
    )?)
}

pub async fn item_details(
    State(service): State<Arc<ItemService>>,
    EntityId(id): EntityId,
) -> Result<Html<String>> {
    let item = ItemResponseDto::from(service.get_with_category(id).await?);

    Ok(views::render(
        "item_detail.html",
        context! { title => "Item Details", item },
    )?)
}

pub async fn create_item_form(State(service): State<Arc<ItemService>>) -> Result<Html<String>> {
    render_form(&service, CREATE_TITLE, &ItemFormDto::default(), &[]).await
}

pub async fn create_item(
    State(service): State<Arc<ItemService>>,
    AppForm(form): AppForm<ItemFormDto>,
) -> Result<Response> {
    let (form, parsed) = parse_submission(&service, form).await?;
    let new = match parsed {
        Ok(new) => new,
        Err(errors) => {
            return Ok(render_form(&service, CREATE_TITLE, &form, &errors)
                .await?
                .into_response())
        }
    };

    match service.create(new).await {
        Ok(item) => Ok(Redirect::to(&item.url()).into_response()),
        // Category removed between the existence check and the write
        Err(AppError::BadRequest(msg)) => {
            let errors = [FieldError::new("category", msg)];
            Ok(render_form(&service, CREATE_TITLE, &form, &errors)
                .await?
                .into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn delete_item_form(
    State(service): State<Arc<ItemService>>,
    EntityId(id): EntityId,
) -> Result<Html<String>> {
    let item = ItemResponseDto::from(service.get_with_category(id).await?);

    Ok(views::render(
        "item_delete.html",
        context! { title => "Delete Item", item },
    )?)
}

/// Delete the item and go back to the category it belonged to
pub async fn delete_item(
    State(service): State<Arc<ItemService>>,
    EntityId(id): EntityId,
) -> Result<Redirect> {
    match service.delete(id).await? {
        Some(item) => Ok(Redirect::to(&format!("/category/{}", item.category_id))),
        None => Ok(Redirect::to(ITEM_LIST_PATH)),
    }
}

pub async fn update_item_form(
    State(service): State<Arc<ItemService>>,
    EntityId(id): EntityId,
) -> Result<Html<String>> {
    let item = service.get(id).await?;
    render_form(&service, UPDATE_TITLE, &ItemFormDto::from(&item), &[]).await
}

pub async fn update_item(
    State(service): State<Arc<ItemService>>,
    EntityId(id): EntityId,
    AppForm(form): AppForm<ItemFormDto>,
) -> Result<Response> {
    let (form, parsed) = parse_submission(&service, form).await?;
    let new = match parsed {
        Ok(new) => new,
        Err(errors) => {
            return Ok(render_form(&service, UPDATE_TITLE, &form, &errors)
                .await?
                .into_response())
        }
    };

    match service.update(id, new).await {
        Ok(item) => Ok(Redirect::to(&item.url()).into_response()),
        Err(AppError::BadRequest(msg)) => {
            let errors = [FieldError::new("category", msg)];
            Ok(render_form(&service, UPDATE_TITLE, &form, &errors)
                .await?
                .into_response())
        }
        Err(e) => Err(e),
    }
}
