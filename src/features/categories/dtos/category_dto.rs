use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, NewCategory};
use crate::shared::validation::{check_stored_lengths, escape_html, field_errors, FieldError};

/// Submitted category form.
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryFormDto {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 100,
        message = "Category name must contain between 3 and 100 characters"
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(length(
        min = 5,
        max = 500,
        message = "Category description must contain between 5 and 500 characters"
    ))]
    pub description: String,
}

impl CategoryFormDto {
    /// Field order used when listing errors
    pub const FIELDS: [&'static str; 2] = ["name", "description"];

    /// Trim, validate, then escape.
    ///
    /// The returned form holds the escaped values either way so it can be
    /// shown again; the error list is empty when the submission is valid.
    pub fn sanitize(self) -> (Self, Vec<FieldError>) {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        let mut errors = field_errors(trimmed.validate(), &Self::FIELDS);

        let escaped = Self {
            name: escape_html(&trimmed.name),
            description: escape_html(&trimmed.description),
        };
        check_stored_lengths(&escaped.name, &escaped.description, &mut errors);
        errors.sort_by_key(|e| Self::FIELDS.iter().position(|f| *f == e.field));

        (escaped, errors)
    }

    pub fn to_new_category(&self) -> NewCategory {
        NewCategory {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Category> for CategoryFormDto {
    fn from(c: &Category) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
        }
    }
}

/// View DTO for category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            url: c.url(),
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at.format("%b %-d, %Y").to_string(),
            updated_at: c.updated_at.format("%b %-d, %Y").to_string(),
        }
    }
}
