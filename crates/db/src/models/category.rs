//! Category entity model and DTOs.

use forum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::double_option;

/// A row from the `forum_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    /// Parent category; `None` for root categories.
    pub category_id: Option<DbId>,
    pub title: String,
    pub subtitle: Option<String>,
    pub weight: i32,
    pub allows_threads: bool,
    pub deleted_at: Option<Timestamp>,
}

impl Category {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    pub category_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 255))]
    pub subtitle: Option<String>,
    /// Defaults to 0.
    pub weight: Option<i32>,
    /// Defaults to `true`.
    pub allows_threads: Option<bool>,
}

/// DTO for updating a category. All fields are optional.
///
/// `category_id` distinguishes an absent field (keep the parent) from an
/// explicit `null` (move to the root).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<DbId>>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub subtitle: Option<String>,
    pub weight: Option<i32>,
    pub allows_threads: Option<bool>,
}
