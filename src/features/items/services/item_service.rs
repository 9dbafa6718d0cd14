use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::items::models::{Item, ItemWithCategory, NewItem};
use crate::features::items::repositories::ItemRepository;

/// Service for item operations
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { items, categories }
    }

    /// List all items ordered by name, with categories resolved
    pub async fn list(&self) -> Result<Vec<ItemWithCategory>> {
        self.items.list_with_category().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    pub async fn get_with_category(&self, id: Uuid) -> Result<ItemWithCategory> {
        self.items
            .find_with_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    /// Categories offered by the item form, ordered by name
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    pub async fn category_exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.categories.find_by_id(id).await?.is_some())
    }

    pub async fn create(&self, new: NewItem) -> Result<Item> {
        let item = self.items.insert(&new).await?;
        tracing::info!(
            "Item created: id={}, category_id={}",
            item.id,
            item.category_id
        );
        Ok(item)
    }

    /// Overwrite the item at `id`
    pub async fn update(&self, id: Uuid, new: NewItem) -> Result<Item> {
        let item = self
            .items
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        tracing::info!("Item updated: id={}", item.id);
        Ok(item)
    }

    /// Delete unconditionally, returning what was removed
    pub async fn delete(&self, id: Uuid) -> Result<Option<Item>> {
        let removed = self.items.delete(id).await?;
        if let Some(item) = &removed {
            tracing::info!("Item deleted: id={}", item.id);
        }
        Ok(removed)
    }
}
