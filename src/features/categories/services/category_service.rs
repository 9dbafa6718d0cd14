use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, NewCategory};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::items::models::ItemSummary;
use crate::features::items::repositories::ItemRepository;

/// A category together with the items that reference it
#[derive(Debug, Clone)]
pub struct CategoryWithItems {
    pub category: Category,
    pub items: Vec<ItemSummary>,
}

/// Result of submitting a new category
#[derive(Debug, Clone)]
pub enum CreateCategoryOutcome {
    Created(Category),
    /// A category with the same name was already stored; nothing was written
    Existing(Category),
}

/// Result of asking to delete a category
#[derive(Debug, Clone)]
pub enum DeleteCategoryOutcome {
    Deleted,
    /// Items still reference the category; nothing was removed
    Blocked(CategoryWithItems),
    Missing,
}

/// Service for category operations
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, items: Arc<dyn ItemRepository>) -> Self {
        Self { categories, items }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    /// Get category by id
    pub async fn get(&self, id: Uuid) -> Result<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Fetch a category and its items in parallel
    pub async fn find_with_items(&self, id: Uuid) -> Result<Option<CategoryWithItems>> {
        let (category, items) = futures::try_join!(
            self.categories.find_by_id(id),
            self.items.list_by_category(id)
        )?;

        Ok(category.map(|category| CategoryWithItems { category, items }))
    }

    pub async fn get_with_items(&self, id: Uuid) -> Result<CategoryWithItems> {
        self.find_with_items(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Store a new category unless one with the same name exists
    pub async fn create(&self, new: NewCategory) -> Result<CreateCategoryOutcome> {
        if let Some(existing) = self.categories.find_by_name(&new.name).await? {
            tracing::info!("Category '{}' already exists: id={}", new.name, existing.id);
            return Ok(CreateCategoryOutcome::Existing(existing));
        }

        match self.categories.insert(&new).await {
            Ok(category) => {
                tracing::info!("Category created: id={}, name={}", category.id, category.name);
                Ok(CreateCategoryOutcome::Created(category))
            }
            // Lost a race with a concurrent insert of the same name
            Err(AppError::Conflict(msg)) => self
                .categories
                .find_by_name(&new.name)
                .await?
                .map(CreateCategoryOutcome::Existing)
                .ok_or(AppError::Conflict(msg)),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the category at `id`.
    ///
    /// Fails with `AppError::Conflict` when another category owns the name.
    pub async fn update(&self, id: Uuid, new: NewCategory) -> Result<Category> {
        let category = self
            .categories
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        tracing::info!("Category updated: id={}", category.id);
        Ok(category)
    }

    /// Delete the category if no item references it
    pub async fn delete(&self, id: Uuid) -> Result<DeleteCategoryOutcome> {
        let Some(found) = self.find_with_items(id).await? else {
            return Ok(DeleteCategoryOutcome::Missing);
        };

        if !found.items.is_empty() {
            tracing::info!(
                "Refusing to delete category {}: {} item(s) still reference it",
                id,
                found.items.len()
            );
            return Ok(DeleteCategoryOutcome::Blocked(found));
        }

        match self.categories.delete(id).await {
            Ok(true) => {
                tracing::info!("Category deleted: id={}", id);
                Ok(DeleteCategoryOutcome::Deleted)
            }
            Ok(false) => Ok(DeleteCategoryOutcome::Missing),
            // An item was added between the check and the delete
            Err(AppError::Conflict(_)) => Ok(self
                .find_with_items(id)
                .await?
                .map(DeleteCategoryOutcome::Blocked)
                .unwrap_or(DeleteCategoryOutcome::Missing)),
            Err(e) => Err(e),
        }
    }
}
