//! Repository for the `forum_categories` table.

use forum_core::hierarchy::MAX_CATEGORY_DEPTH;
use forum_core::pagination::PageRequest;
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, title, subtitle, weight, allows_threads, deleted_at";

/// Columns a category listing may be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "title", "weight"];

/// Listing order when the client asks for none.
const DEFAULT_ORDER: &str = "weight, id";

/// Provides CRUD and hierarchy queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// `weight` defaults to 0 and `allows_threads` to `true`.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO forum_categories (category_id, title, subtitle, weight, allows_threads)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(input.weight)
            .bind(input.allows_threads)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forum_categories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forum_categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find categories by ID, including soft-deleted rows. Missing ids are
    /// skipped.
    pub async fn find_many_include_deleted(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forum_categories WHERE id = ANY($1)");
        sqlx::query_as::<_, Category>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// One page of categories, by weight unless `sort` says otherwise.
    pub async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let order = sort.map_or_else(|| DEFAULT_ORDER.to_string(), Sort::to_sql);
        let query = format!(
            "SELECT {COLUMNS} FROM forum_categories
             WHERE ($1 OR deleted_at IS NULL)
             ORDER BY {order}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(include_deleted)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of categories, for pagination.
    pub async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM forum_categories WHERE ($1 OR deleted_at IS NULL)")
            .bind(include_deleted)
            .fetch_one(pool)
            .await
    }

    /// Live child categories of `parent_id`, ordered by weight.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forum_categories
             WHERE category_id = $1 AND deleted_at IS NULL
             ORDER BY weight, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Ids on the parent chain starting at `id` and walking towards the root.
    ///
    /// Soft-deleted categories are included: a trashed ancestor still forms
    /// part of the chain once restored. The walk stops after
    /// [`MAX_CATEGORY_DEPTH`] levels so a corrupt chain cannot loop forever.
    pub async fn parent_chain(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "WITH RECURSIVE chain AS (
                 SELECT id, category_id, 1 AS depth
                 FROM forum_categories WHERE id = $1
                 UNION ALL
                 SELECT c.id, c.category_id, chain.depth + 1
                 FROM forum_categories c
                 JOIN chain ON c.id = chain.category_id
                 WHERE chain.depth < $2
             )
             SELECT id FROM chain ORDER BY depth",
        )
        .bind(id)
        .bind(MAX_CATEGORY_DEPTH)
        .fetch_all(pool)
        .await
    }

    /// Live post counts of every live thread in the given categories, as
    /// `(category_id, posts)` with one entry per thread. Threads without
    /// live posts report 0; categories without live threads have no entry.
    pub async fn thread_post_counts(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT t.category_id, COUNT(p.id)
             FROM forum_threads t
             LEFT JOIN forum_posts p ON p.thread_id = t.id AND p.deleted_at IS NULL
             WHERE t.category_id = ANY($1) AND t.deleted_at IS NULL
             GROUP BY t.category_id, t.id",
        )
        .bind(category_ids)
        .fetch_all(pool)
        .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// The parent is replaced only when `input.category_id` is present;
    /// `Some(None)` detaches the category to the root. Callers are expected
    /// to have validated the new parent chain.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE forum_categories SET
                category_id = CASE WHEN $2 THEN $3 ELSE category_id END,
                title = COALESCE($4, title),
                subtitle = COALESCE($5, subtitle),
                weight = COALESCE($6, weight),
                allows_threads = COALESCE($7, allows_threads)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.category_id.is_some())
            .bind(input.category_id.flatten())
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(input.weight)
            .bind(input.allows_threads)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a category by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted category. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_categories SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a category by ID. Returns `true` if a row was removed.
    ///
    /// Threads (and their posts) go with it; child categories become roots.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forum_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
