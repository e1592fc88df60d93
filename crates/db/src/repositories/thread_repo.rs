//! Repository for the `forum_threads` table.

use forum_core::pagination::PageRequest;
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::Post;
use crate::models::thread::{CreateThread, Thread, UpdateThread};
use crate::repositories::post_repo::COLUMNS as POST_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, author_id, title, pinned, created_at, updated_at, deleted_at";

/// Columns a thread listing may be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "title", "created_at", "updated_at"];

/// Listing order when the client asks for none: most recently active first.
const DEFAULT_ORDER: &str = "updated_at DESC, id DESC";

/// Provides CRUD operations for threads.
pub struct ThreadRepo;

impl ThreadRepo {
    /// Insert a thread and its opening post in one transaction.
    pub async fn create_with_opening_post(
        pool: &PgPool,
        category_id: DbId,
        author_id: DbId,
        input: &CreateThread,
    ) -> Result<(Thread, Post), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let thread_query = format!(
            "INSERT INTO forum_threads (category_id, author_id, title, pinned)
             VALUES ($1, $2, $3, COALESCE($4, false))
             RETURNING {COLUMNS}"
        );
        let thread = sqlx::query_as::<_, Thread>(&thread_query)
            .bind(category_id)
            .bind(author_id)
            .bind(&input.title)
            .bind(input.pinned)
            .fetch_one(&mut *tx)
            .await?;

        let post_query = format!(
            "INSERT INTO forum_posts (thread_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&post_query)
            .bind(thread.id)
            .bind(author_id)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((thread, post))
    }

    /// Find a thread by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Thread>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forum_threads WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a thread by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Thread>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forum_threads WHERE id = $1");
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of all threads, most recently active first unless `sort`
    /// says otherwise.
    pub async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Thread>, sqlx::Error> {
        let order = sort.map_or_else(|| DEFAULT_ORDER.to_string(), Sort::to_sql);
        let query = format!(
            "SELECT {COLUMNS} FROM forum_threads
             WHERE ($1 OR deleted_at IS NULL)
             ORDER BY {order}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(include_deleted)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of threads, for pagination.
    pub async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM forum_threads WHERE ($1 OR deleted_at IS NULL)")
            .bind(include_deleted)
            .fetch_one(pool)
            .await
    }

    /// One page of a category's threads: pinned first, then most recently
    /// updated (or by `sort`).
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Thread>, sqlx::Error> {
        let order = sort.map_or_else(|| DEFAULT_ORDER.to_string(), Sort::to_sql);
        let query = format!(
            "SELECT {COLUMNS} FROM forum_threads
             WHERE category_id = $1 AND ($2 OR deleted_at IS NULL)
             ORDER BY pinned DESC, {order}
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(category_id)
            .bind(include_deleted)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Number of threads in a category.
    pub async fn count_by_category(
        pool: &PgPool,
        category_id: DbId,
        include_deleted: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM forum_threads
             WHERE category_id = $1 AND ($2 OR deleted_at IS NULL)",
        )
        .bind(category_id)
        .bind(include_deleted)
        .fetch_one(pool)
        .await
    }

    /// The most recently created live thread of each given category.
    /// Categories without live threads have no entry.
    pub async fn newest_by_category(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<Thread>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (category_id) {COLUMNS} FROM forum_threads
             WHERE category_id = ANY($1) AND deleted_at IS NULL
             ORDER BY category_id, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(category_ids)
            .fetch_all(pool)
            .await
    }

    /// The most recently updated live thread of each given category.
    pub async fn latest_active_by_category(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<Thread>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (category_id) {COLUMNS} FROM forum_threads
             WHERE category_id = ANY($1) AND deleted_at IS NULL
             ORDER BY category_id, updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(category_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a thread without touching `updated_at`.
    ///
    /// Only non-`None` fields in `input` are applied. Returns `None` if no
    /// live row with the given `id` exists.
    pub async fn update_quietly(
        pool: &PgPool,
        id: DbId,
        input: &UpdateThread,
    ) -> Result<Option<Thread>, sqlx::Error> {
        let query = format!(
            "UPDATE forum_threads SET
                title = COALESCE($2, title),
                pinned = COALESCE($3, pinned),
                category_id = COALESCE($4, category_id)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.pinned)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a thread by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_threads SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted thread. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_threads SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a thread and its posts. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forum_threads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
