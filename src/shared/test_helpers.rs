//! In-memory stand-ins for the PostgreSQL repositories and a router builder
//! for HTTP-level tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::app::{build_router, AppServices};
use crate::core::config::RateLimitConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, NewCategory};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::categories::CategoryService;
use crate::features::items::models::{Item, ItemSummary, ItemWithCategory, NewItem};
use crate::features::items::repositories::ItemRepository;
use crate::features::items::ItemService;
use crate::features::rate_limits::RateLimitService;
use crate::shared::validation::{STORED_DESCRIPTION_MAX_CHARS, STORED_NAME_MAX_CHARS};

#[derive(Default)]
struct Tables {
    categories: HashMap<Uuid, Category>,
    items: HashMap<Uuid, Item>,
}

/// Both repositories over one shared set of tables, with the same
/// constraints the database schema enforces.
#[derive(Default)]
pub struct InMemoryInventory {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryInventory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail like a lost database connection
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub async fn insert_category(&self, new: &NewCategory) -> Category {
        CategoryRepository::insert(self, new)
            .await
            .expect("failed to seed category")
    }

    pub async fn insert_item(&self, new: &NewItem) -> Item {
        ItemRepository::insert(self, new)
            .await
            .expect("failed to seed item")
    }

    pub async fn category_count(&self) -> usize {
        self.tables.read().await.categories.len()
    }

    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }
}

/// Mirrors the `char_length` checks on the text columns
fn check_text_lengths(name: &str, description: &str) -> Result<()> {
    if name.chars().count() > STORED_NAME_MAX_CHARS
        || description.chars().count() > STORED_DESCRIPTION_MAX_CHARS
    {
        return Err(AppError::Database(sqlx::Error::Protocol(
            "new row violates check constraint on text length".to_string(),
        )));
    }
    Ok(())
}

/// Byte-wise, like `ORDER BY name COLLATE "C"`
fn sorted_by_name<T>(mut rows: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    rows.sort_by(|a, b| name(a).cmp(name(b)));
    rows
}

#[async_trait]
impl CategoryRepository for InMemoryInventory {
    async fn list(&self) -> Result<Vec<Category>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables.categories.values().cloned().collect::<Vec<_>>(),
            |c| c.name.as_str(),
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        self.check_available()?;
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, new: &NewCategory) -> Result<Category> {
        self.check_available()?;
        check_text_lengths(&new.name, &new.description)?;
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == new.name) {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                new.name
            )));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, new: &NewCategory) -> Result<Option<Category>> {
        self.check_available()?;
        check_text_lengths(&new.name, &new.description)?;
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|c| c.id != id && c.name == new.name)
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                new.name
            )));
        }

        Ok(tables.categories.get_mut(&id).map(|category| {
            category.name = new.name.clone();
            category.description = new.description.clone();
            category.updated_at = Utc::now();
            category.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.items.values().any(|i| i.category_id == id) {
            return Err(AppError::Conflict("Category still has items".to_string()));
        }
        Ok(tables.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl ItemRepository for InMemoryInventory {
    async fn list_with_category(&self) -> Result<Vec<ItemWithCategory>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let rows: Vec<ItemWithCategory> = tables
            .items
            .values()
            .filter_map(|item| {
                let category = tables.categories.get(&item.category_id)?.clone();
                Some(ItemWithCategory {
                    item: item.clone(),
                    category,
                })
            })
            .collect();
        Ok(sorted_by_name(rows, |r| r.item.name.as_str()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>> {
        self.check_available()?;
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn find_with_category(&self, id: Uuid) -> Result<Option<ItemWithCategory>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.items.get(&id).and_then(|item| {
            let category = tables.categories.get(&item.category_id)?.clone();
            Some(ItemWithCategory {
                item: item.clone(),
                category,
            })
        }))
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<ItemSummary>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let rows: Vec<ItemSummary> = tables
            .items
            .values()
            .filter(|i| i.category_id == category_id)
            .map(|i| ItemSummary {
                id: i.id,
                name: i.name.clone(),
            })
            .collect();
        Ok(sorted_by_name(rows, |r| r.name.as_str()))
    }

    async fn insert(&self, new: &NewItem) -> Result<Item> {
        self.check_available()?;
        check_text_lengths(&new.name, &new.description)?;
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&new.category_id) {
            return Err(AppError::BadRequest(
                "Selected category does not exist".to_string(),
            ));
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            category_id: new.category_id,
            price: new.price,
            number_in_stock: new.number_in_stock,
            created_at: now,
            updated_at: now,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, new: &NewItem) -> Result<Option<Item>> {
        self.check_available()?;
        check_text_lengths(&new.name, &new.description)?;
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&new.category_id) {
            return Err(AppError::BadRequest(
                "Selected category does not exist".to_string(),
            ));
        }

        Ok(tables.items.get_mut(&id).map(|item| {
            item.name = new.name.clone();
            item.description = new.description.clone();
            item.category_id = new.category_id;
            item.price = new.price;
            item.number_in_stock = new.number_in_stock;
            item.updated_at = Utc::now();
            item.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Item>> {
        self.check_available()?;
        Ok(self.tables.write().await.items.remove(&id))
    }
}

/// Services wired to `store` with a rate limit high enough to stay out of the way
pub fn services_for(store: &Arc<InMemoryInventory>, rate_limit: RateLimitConfig) -> AppServices {
    let categories: Arc<dyn CategoryRepository> = store.clone();
    let items: Arc<dyn ItemRepository> = store.clone();

    AppServices {
        category_service: Arc::new(CategoryService::new(categories.clone(), items.clone())),
        item_service: Arc::new(ItemService::new(items, categories)),
        rate_limiter: Arc::new(RateLimitService::new(&rate_limit)),
    }
}

pub fn test_server(store: &Arc<InMemoryInventory>) -> TestServer {
    test_server_with_limit(
        store,
        RateLimitConfig {
            window: Duration::from_secs(10),
            max_requests: 10_000,
        },
    )
}

pub fn test_server_with_limit(
    store: &Arc<InMemoryInventory>,
    rate_limit: RateLimitConfig,
) -> TestServer {
    let router = build_router(services_for(store, rate_limit), "public");
    TestServer::new(router).expect("failed to build test server")
}
