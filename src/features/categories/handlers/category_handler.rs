use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppForm, EntityId};
use crate::features::categories::dtos::{CategoryFormDto, CategoryResponseDto};
use crate::features::categories::services::{
    CategoryService, CategoryWithItems, CreateCategoryOutcome, DeleteCategoryOutcome,
};
use crate::features::items::dtos::ItemSummaryDto;
use crate::shared::constants::CATEGORY_LIST_PATH;
use crate::shared::validation::FieldError;
use crate::shared::views;

const CREATE_TITLE: &str = "Create Category";
const UPDATE_TITLE: &str = "Update Category";

fn render_form(title: &str, form: &CategoryFormDto, errors: &[FieldError]) -> Result<Html<String>> {
    Ok(views::render(
        "category_form.html",
        context! { title => title, category => form, errors => errors },
    )?)
}

fn render_delete(found: CategoryWithItems) -> Result<Html<String>> {
    let category = CategoryResponseDto::from(found.category);
    let category_items: Vec<ItemSummaryDto> = found.items.into_iter().map(Into::into).collect();

    Ok(views::render(
        "category_delete.html",
        context! { title => "Delete Category", category, category_items },
    )?)
}

/// List all categories
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Html<String>> {
    let categories: Vec<CategoryResponseDto> = service
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(views::render(
        "category_list.html",
        context! { title => "Category List", categories },
    )?)
}

/// Category detail page with the items that belong to it
pub async fn category_details(
    State(service): State<Arc<CategoryService>>,
    EntityId(id): EntityId,
) -> Result<Html<String>> {
    let found = service.get_with_items(id).await?;
    let category = CategoryResponseDto::from(found.category);
    let category_items: Vec<ItemSummaryDto> = found.items.into_iter().map(Into::into).collect();

    Ok(views::render(
        "category_detail.html",
        context! { title => "Category Details", category, category_items },
    )?)
}

pub async fn create_category_form() -> Result<Html<String>> {
    render_form(CREATE_TITLE, &CategoryFormDto::default(), &[])
}

/// Create a category, or redirect to an existing one with the same name
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppForm(form): AppForm<CategoryFormDto>,
) -> Result<Response> {
    let (form, errors) = form.sanitize();
    if !errors.is_empty() {
        return Ok(render_form(CREATE_TITLE, &form, &errors)?.into_response());
    }

    match service.create(form.to_new_category()).await? {
        CreateCategoryOutcome::Created(_) => Ok(Redirect::to(CATEGORY_LIST_PATH).into_response()),
        CreateCategoryOutcome::Existing(existing) => {
            Ok(Redirect::to(&existing.url()).into_response())
        }
    }
}

/// Confirmation page; a missing category sends the user back to the list
pub async fn delete_category_form(
    State(service): State<Arc<CategoryService>>,
    EntityId(id): EntityId,
) -> Result<Response> {
    match service.find_with_items(id).await? {
        Some(found) => Ok(render_delete(found)?.into_response()),
        None => Ok(Redirect::to(CATEGORY_LIST_PATH).into_response()),
    }
}

/// Delete a category that no item references
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    EntityId(id): EntityId,
) -> Result<Response> {
    match service.delete(id).await? {
        DeleteCategoryOutcome::Blocked(found) => Ok(render_delete(found)?.into_response()),
        DeleteCategoryOutcome::Deleted | DeleteCategoryOutcome::Missing => {
            Ok(Redirect::to(CATEGORY_LIST_PATH).into_response())
        }
    }
}

pub async fn update_category_form(
    State(service): State<Arc<CategoryService>>,
    EntityId(id): EntityId,
) -> Result<Html<String>> {
    let category = service.get(id).await?;
    render_form(UPDATE_TITLE, &CategoryFormDto::from(&category), &[])
}

pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    EntityId(id): EntityId,
    AppForm(form): AppForm<CategoryFormDto>,
) -> Result<Response> {
    let (form, errors) = form.sanitize();
    if !errors.is_empty() {
        return Ok(render_form(UPDATE_TITLE, &form, &errors)?.into_response());
    }

    match service.update(id, form.to_new_category()).await {
        Ok(category) => Ok(Redirect::to(&category.url()).into_response()),
        Err(AppError::Conflict(_)) => {
            let errors = [FieldError::new(
                "name",
                "Another category already uses this name",
            )];
            Ok(render_form(UPDATE_TITLE, &form, &errors)?.into_response())
        }
        Err(e) => Err(e),
    }
}
