//! Repository for the `forum_posts` table.

use forum_core::pagination::PageRequest;
use forum_core::sorting::Sort;
use forum_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, UpdatePost};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, thread_id, author_id, content, created_at, updated_at, deleted_at";

/// Columns a post listing may be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// Listing order when the client asks for none: newest first.
const DEFAULT_ORDER: &str = "created_at DESC, id DESC";

/// `COLUMNS` qualified with the `p` alias used by joined queries.
const JOINED_COLUMNS: &str = "p.id, p.thread_id, p.author_id, p.content, p.created_at, \
                              p.updated_at, p.deleted_at";

/// Joins restricting posts to live threads in live categories.
const LIVE_PARENTS: &str = "JOIN forum_threads t ON t.id = p.thread_id AND t.deleted_at IS NULL
     JOIN forum_categories c ON c.id = t.category_id AND c.deleted_at IS NULL";

/// Provides CRUD operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a reply and bump the parent thread's `updated_at` in one
    /// transaction.
    pub async fn create_reply(
        pool: &PgPool,
        thread_id: DbId,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO forum_posts (thread_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .bind(author_id)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE forum_threads SET updated_at = NOW() WHERE id = $1")
            .bind(thread_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(post)
    }

    /// Find a post by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forum_posts WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forum_posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of all posts, newest first unless `sort` says otherwise.
    pub async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let order = sort.map_or_else(|| DEFAULT_ORDER.to_string(), Sort::to_sql);
        let query = format!(
            "SELECT {COLUMNS} FROM forum_posts
             WHERE ($1 OR deleted_at IS NULL)
             ORDER BY {order}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(include_deleted)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of posts, for pagination.
    pub async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM forum_posts WHERE ($1 OR deleted_at IS NULL)")
            .bind(include_deleted)
            .fetch_one(pool)
            .await
    }

    /// One page of a thread's live posts, newest first unless `sort` says
    /// otherwise.
    pub async fn list_by_thread(
        pool: &PgPool,
        thread_id: DbId,
        page: &PageRequest,
        sort: Option<&Sort>,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let order = sort.map_or_else(|| DEFAULT_ORDER.to_string(), Sort::to_sql);
        let query = format!(
            "SELECT {COLUMNS} FROM forum_posts
             WHERE thread_id = $1 AND deleted_at IS NULL
             ORDER BY {order}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Number of live posts in a thread.
    pub async fn count_by_thread(pool: &PgPool, thread_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM forum_posts WHERE thread_id = $1 AND deleted_at IS NULL",
        )
        .bind(thread_id)
        .fetch_one(pool)
        .await
    }

    /// Live post counts per thread, as `(thread_id, posts)`. Threads without
    /// live posts have no entry.
    pub async fn count_by_threads(
        pool: &PgPool,
        thread_ids: &[DbId],
    ) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT thread_id, COUNT(*) FROM forum_posts
             WHERE thread_id = ANY($1) AND deleted_at IS NULL
             GROUP BY thread_id",
        )
        .bind(thread_ids)
        .fetch_all(pool)
        .await
    }

    /// The newest live post of each given thread.
    pub async fn latest_by_thread(
        pool: &PgPool,
        thread_ids: &[DbId],
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (thread_id) {COLUMNS} FROM forum_posts
             WHERE thread_id = ANY($1) AND deleted_at IS NULL
             ORDER BY thread_id, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_ids)
            .fetch_all(pool)
            .await
    }

    /// One page of live posts matching `tsquery`, best match first.
    ///
    /// Posts in trashed threads or categories are not searched. `tsquery`
    /// must already be sanitized (see `forum_core::search`).
    pub async fn search(
        pool: &PgPool,
        tsquery: &str,
        page: &PageRequest,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM forum_posts p
             {LIVE_PARENTS}
             WHERE p.deleted_at IS NULL
               AND to_tsvector('simple', p.content) @@ to_tsquery('simple', $1)
             ORDER BY ts_rank(to_tsvector('simple', p.content), to_tsquery('simple', $1)) DESC,
                      p.created_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(tsquery)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Number of posts [`search`](Self::search) would return across all pages.
    pub async fn count_search(pool: &PgPool, tsquery: &str) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM forum_posts p
             {LIVE_PARENTS}
             WHERE p.deleted_at IS NULL
               AND to_tsvector('simple', p.content) @@ to_tsquery('simple', $1)"
        );
        sqlx::query_scalar(&query).bind(tsquery).fetch_one(pool).await
    }

    /// One page of live posts updated after `since`, most recently updated
    /// first. Posts in trashed threads or categories are left out.
    pub async fn recent(
        pool: &PgPool,
        since: Timestamp,
        page: &PageRequest,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM forum_posts p
             {LIVE_PARENTS}
             WHERE p.deleted_at IS NULL AND p.updated_at > $1
             ORDER BY p.updated_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(since)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Number of posts [`recent`](Self::recent) would return across all pages.
    pub async fn count_recent(pool: &PgPool, since: Timestamp) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM forum_posts p
             {LIVE_PARENTS}
             WHERE p.deleted_at IS NULL AND p.updated_at > $1"
        );
        sqlx::query_scalar(&query).bind(since).fetch_one(pool).await
    }

    /// Edit a post without touching `updated_at`.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update_quietly(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE forum_posts SET content = COALESCE($2, content)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a post by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted post. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forum_posts SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a post by ID. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forum_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
