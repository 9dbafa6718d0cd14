use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::items::models::{Item, ItemSummary, ItemWithCategory, NewItem};
use crate::shared::validation::{
    check_stored_lengths, escape_html, field_errors, FieldError, PRICE_REGEX,
    WHOLE_NUMBER_REGEX,
};

/// Upper bound (exclusive) of the `numeric(12, 2)` price column
const MAX_PRICE: i64 = 10_000_000_000;

/// Empty values are left to the `length` rule so each field reports one message
fn validate_price(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || PRICE_REGEX.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("price").with_message(Cow::Borrowed(
        "Price must be a non-negative amount with at most two decimals.",
    )))
}

fn validate_whole_number(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || WHOLE_NUMBER_REGEX.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("whole_number")
        .with_message(Cow::Borrowed("Number in stock must be a whole number.")))
}

/// Submitted item form; every field arrives as text
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemFormDto {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 100,
        message = "Name must not be empty. Min: 3 characters, max: 100"
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(length(
        min = 5,
        max = 500,
        message = "Description must not be empty. Min: 5 characters, max: 500"
    ))]
    pub description: String,

    /// Id of the selected category
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Price must not be empty."),
        custom(function = "validate_price")
    )]
    pub price: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Number in stock must not be empty."),
        custom(function = "validate_whole_number")
    )]
    pub number_in_stock: String,
}

impl ItemFormDto {
    /// Field order used when listing errors
    pub const FIELDS: [&'static str; 5] =
        ["name", "description", "category", "price", "number_in_stock"];

    /// Trim, validate, escape, then convert to typed values.
    ///
    /// The returned form holds the escaped values either way so it can be
    /// shown again.
    pub fn sanitize(self) -> (Self, Result<NewItem, Vec<FieldError>>) {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price.trim().to_string(),
            number_in_stock: self.number_in_stock.trim().to_string(),
        };
        let mut errors = field_errors(trimmed.validate(), &Self::FIELDS);

        let escaped = Self {
            name: escape_html(&trimmed.name),
            description: escape_html(&trimmed.description),
            category: escape_html(&trimmed.category),
            price: escape_html(&trimmed.price),
            number_in_stock: escape_html(&trimmed.number_in_stock),
        };

        check_stored_lengths(&escaped.name, &escaped.description, &mut errors);

        let category_id = Uuid::parse_str(&escaped.category).ok();
        if category_id.is_none() {
            errors.push(FieldError::new("category", "Category must be selected."));
        }
        let price = Decimal::from_str(&escaped.price)
            .ok()
            .filter(|p| *p < Decimal::from(MAX_PRICE));
        if price.is_none() && !errors.iter().any(|e| e.field == "price") {
            errors.push(FieldError::new("price", "Price is too large."));
        }
        let number_in_stock = escaped.number_in_stock.parse::<i32>().ok();
        if number_in_stock.is_none() && !errors.iter().any(|e| e.field == "number_in_stock") {
            errors.push(FieldError::new(
                "number_in_stock",
                "Number in stock is too large.",
            ));
        }

        let parsed = match (category_id, price, number_in_stock) {
            (Some(category_id), Some(price), Some(number_in_stock)) if errors.is_empty() => {
                Ok(NewItem {
                    name: escaped.name.clone(),
                    description: escaped.description.clone(),
                    category_id,
                    price,
                    number_in_stock,
                })
            }
            _ => {
                errors.sort_by_key(|e| Self::FIELDS.iter().position(|f| *f == e.field));
                Err(errors)
            }
        };

        (escaped, parsed)
    }
}

impl From<&Item> for ItemFormDto {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category_id.to_string(),
            price: item.price.to_string(),
            number_in_stock: item.number_in_stock.to_string(),
        }
    }
}

/// View DTO for item with its category resolved
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    pub number_in_stock: i32,
    pub url: String,
    pub category: CategoryResponseDto,
}

impl From<ItemWithCategory> for ItemResponseDto {
    fn from(row: ItemWithCategory) -> Self {
        let ItemWithCategory { item, category } = row;
        Self {
            url: item.url(),
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price.to_string(),
            number_in_stock: item.number_in_stock,
            category: category.into(),
        }
    }
}

/// View DTO for an item listed on its category's pages
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<ItemSummary> for ItemSummaryDto {
    fn from(s: ItemSummary) -> Self {
        Self {
            url: format!("/item/{}", s.id),
            id: s.id,
            name: s.name,
        }
    }
}
