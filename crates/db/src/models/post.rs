//! Post entity model and DTOs.

use forum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `forum_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub thread_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Post {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for replying to a thread.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 65535))]
    pub content: String,
}

/// DTO for editing a post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(min = 1, max = 65535))]
    pub content: Option<String>,
}
