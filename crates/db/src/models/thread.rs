//! Thread entity model and DTOs.

use forum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `forum_threads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Thread {
    pub id: DbId,
    pub category_id: DbId,
    /// External user id of the thread starter.
    pub author_id: DbId,
    pub title: String,
    pub pinned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Thread {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for starting a thread. `content` becomes the opening post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateThread {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 65535))]
    pub content: String,
    /// Defaults to `false`.
    pub pinned: Option<bool>,
}

/// DTO for updating a thread. All fields are optional; `category_id` moves
/// the thread to another category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateThread {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub pinned: Option<bool>,
    pub category_id: Option<DbId>,
}
