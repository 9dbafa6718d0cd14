use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::items::models::{Item, ItemSummary, ItemWithCategory, NewItem};

/// Storage operations for items.
///
/// Lookups return `Ok(None)` for a missing record. Writes naming a category
/// that does not exist fail with `AppError::BadRequest`.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items ordered by name (byte-wise), each with its category
    async fn list_with_category(&self) -> Result<Vec<ItemWithCategory>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>>;

    async fn find_with_category(&self, id: Uuid) -> Result<Option<ItemWithCategory>>;

    /// Items referencing `category_id`, ordered by name
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<ItemSummary>>;

    async fn insert(&self, new: &NewItem) -> Result<Item>;

    async fn update(&self, id: Uuid, new: &NewItem) -> Result<Option<Item>>;

    /// Returns the removed item, if there was one
    async fn delete(&self, id: Uuid) -> Result<Option<Item>>;
}

pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row of the items/categories join
#[derive(Debug, FromRow)]
struct ItemCategoryRow {
    id: Uuid,
    name: String,
    description: String,
    category_id: Uuid,
    price: Decimal,
    number_in_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: String,
    category_description: String,
    category_created_at: DateTime<Utc>,
    category_updated_at: DateTime<Utc>,
}

impl From<ItemCategoryRow> for ItemWithCategory {
    fn from(row: ItemCategoryRow) -> Self {
        Self {
            category: Category {
                id: row.category_id,
                name: row.category_name,
                description: row.category_description,
                created_at: row.category_created_at,
                updated_at: row.category_updated_at,
            },
            item: Item {
                id: row.id,
                name: row.name,
                description: row.description,
                category_id: row.category_id,
                price: row.price,
                number_in_stock: row.number_in_stock,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT i.id, i.name, i.description, i.category_id, i.price, i.number_in_stock,
           i.created_at, i.updated_at,
           c.name AS category_name, c.description AS category_description,
           c.created_at AS category_created_at, c.updated_at AS category_updated_at
    FROM items i
    JOIN categories c ON c.id = i.category_id
"#;

fn map_write_error(e: sqlx::Error, action: &str) -> AppError {
    let missing_category = e
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation());
    if missing_category {
        return AppError::BadRequest("Selected category does not exist".to_string());
    }
    tracing::error!("Failed to {} item: {:?}", action, e);
    AppError::Database(e)
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn list_with_category(&self) -> Result<Vec<ItemWithCategory>> {
        let rows = sqlx::query_as::<_, ItemCategoryRow>(&format!(
            "{} ORDER BY i.name COLLATE \"C\"",
            SELECT_WITH_CATEGORY
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list items: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, category_id, price, number_in_stock, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get item by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_with_category(&self, id: Uuid) -> Result<Option<ItemWithCategory>> {
        let row = sqlx::query_as::<_, ItemCategoryRow>(&format!(
            "{} WHERE i.id = $1",
            SELECT_WITH_CATEGORY
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get item with category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(row.map(Into::into))
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<ItemSummary>> {
        sqlx::query_as::<_, ItemSummary>(
            r#"
            SELECT id, name
            FROM items
            WHERE category_id = $1
            ORDER BY name COLLATE "C"
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list items in category: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, new: &NewItem) -> Result<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, name, description, category_id, price, number_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, category_id, price, number_in_stock, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.category_id)
        .bind(new.price)
        .bind(new.number_in_stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "insert"))
    }

    async fn update(&self, id: Uuid, new: &NewItem) -> Result<Option<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $2, description = $3, category_id = $4, price = $5,
                number_in_stock = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, category_id, price, number_in_stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.category_id)
        .bind(new.price)
        .bind(new.number_in_stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update"))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            DELETE FROM items
            WHERE id = $1
            RETURNING id, name, description, category_id, price, number_in_stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete item: {:?}", e);
            AppError::Database(e)
        })
    }
}
