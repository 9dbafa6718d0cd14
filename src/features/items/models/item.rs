use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::categories::models::Category;

/// Database model for item
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub number_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Canonical detail page path
    pub fn url(&self) -> String {
        format!("/item/{}", self.id)
    }
}

/// Validated field values for inserting or overwriting an item
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub number_in_stock: i32,
}

/// Item projected to what a category page lists
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
}

/// Item with its category reference resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithCategory {
    pub item: Item,
    pub category: Category,
}
