//! Handlers for the `/threads` resource.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forum_core::access::{authorize, Ability, Actor};
use forum_core::counts::thread_reply_count;
use forum_core::error::CoreError;
use forum_core::pagination::{last_page, Page, PageRequest};
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use forum_core::urls::ThreadRoute;
use forum_db::models::category::Category;
use forum_db::models::post::{CreatePost, Post};
use forum_db::models::thread::{Thread, UpdateThread};
use forum_db::repositories::{thread_repo, CategoryRepo, PostRepo, ThreadRepo};
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use crate::config::ForumConfig;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, QueryParams};
use crate::handlers::category::{ensure_accepts_threads, CategoryResource};
use crate::handlers::post::PostResource;
use crate::handlers::resource::{find_live, Resource};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::MessageResponse;
use crate::state::AppState;

/// A thread with its derived attributes, as seen by one actor.
#[derive(Debug, Serialize)]
pub struct ThreadView {
    #[serde(flatten)]
    pub thread: Thread,
    /// Live posts minus the opening post.
    pub reply_count: i64,
    /// Last page of the thread's live posts (at least 1).
    pub last_page: i64,
    /// Newest live post.
    pub last_post: Option<Post>,
    /// Link to `last_post` on `last_page`; absent when the thread has no posts.
    pub last_post_url: Option<String>,
    pub url: String,
    pub reply_url: String,
    pub delete_url: String,
    /// Whether the actor may reply.
    pub can_post: bool,
    /// Whether the actor may delete the thread.
    pub can_delete: bool,
}

pub struct ThreadResource;

#[async_trait]
impl Resource for ThreadResource {
    const ENTITY: &'static str = "Thread";
    const SINGULAR: &'static str = "thread";
    const PLURAL: &'static str = "threads";
    const SORTABLE: &'static [&'static str] = thread_repo::SORTABLE_COLUMNS;

    type Model = Thread;
    type View = ThreadView;
    type Update = UpdateThread;

    fn per_page(config: &ForumConfig) -> i64 {
        config.threads_per_page
    }

    fn owner_id(model: &Thread) -> Option<DbId> {
        Some(model.author_id)
    }

    fn is_trashed(model: &Thread) -> bool {
        model.is_trashed()
    }

    async fn find(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Thread>, sqlx::Error> {
        if include_deleted {
            ThreadRepo::find_by_id_include_deleted(pool, id).await
        } else {
            ThreadRepo::find_by_id(pool, id).await
        }
    }

    async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Thread>, sqlx::Error> {
        ThreadRepo::list(pool, page, include_deleted, sort).await
    }

    async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        ThreadRepo::count(pool, include_deleted).await
    }

    /// Pinning and moving are moderation; the author alone may only retitle.
    async fn update_quietly(
        state: &AppState,
        actor: Option<&Actor>,
        model: &Thread,
        input: &UpdateThread,
    ) -> AppResult<Option<Thread>> {
        if input.pinned.is_some() || input.category_id.is_some() {
            authorize(
                state.policy.as_ref(),
                actor,
                Ability::Moderate,
                Some(model.author_id),
            )?;
        }
        if let Some(category_id) = input.category_id.filter(|id| *id != model.category_id) {
            let category = find_live::<CategoryResource>(&state.pool, category_id).await?;
            ensure_accepts_threads(&category)?;
        }
        Ok(ThreadRepo::update_quietly(&state.pool, model.id, input).await?)
    }

    async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        ThreadRepo::soft_delete(pool, id).await
    }

    async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        ThreadRepo::restore(pool, id).await
    }

    async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        ThreadRepo::hard_delete(pool, id).await
    }

    async fn check_parent_live(state: &AppState, model: &Thread) -> AppResult<()> {
        if CategoryRepo::find_by_id(&state.pool, model.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Category {} is in the trash; restore it first",
                model.category_id
            ))));
        }
        Ok(())
    }

    async fn present_page(
        state: &AppState,
        models: Vec<Thread>,
        actor: Option<&Actor>,
    ) -> AppResult<Vec<ThreadView>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let pool = &state.pool;
        let forum = &state.config.forum;
        let urls = forum.urls();
        let policy = state.policy.as_ref();

        let thread_ids: Vec<DbId> = models.iter().map(|thread| thread.id).collect();
        let mut category_ids: Vec<DbId> = models.iter().map(|thread| thread.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let categories: HashMap<DbId, Category> =
            CategoryRepo::find_many_include_deleted(pool, &category_ids)
                .await?
                .into_iter()
                .map(|category| (category.id, category))
                .collect();
        let post_counts: HashMap<DbId, i64> = PostRepo::count_by_threads(pool, &thread_ids)
            .await?
            .into_iter()
            .collect();
        let mut last_posts: HashMap<DbId, Post> = PostRepo::latest_by_thread(pool, &thread_ids)
            .await?
            .into_iter()
            .map(|post| (post.thread_id, post))
            .collect();

        models
            .into_iter()
            .map(|thread| -> AppResult<ThreadView> {
                // The FK guarantees the row; it may be trashed.
                let category = categories.get(&thread.category_id).ok_or_else(|| {
                    AppError::Core(CoreError::Internal(format!(
                        "Thread {} references missing category {}",
                        thread.id, thread.category_id
                    )))
                })?;

                let posts = post_counts.get(&thread.id).copied().unwrap_or(0);
                let last_post = last_posts.remove(&thread.id);
                let last_page = last_page(posts, forum.posts_per_page);

                let route = ThreadRoute {
                    category_id: category.id,
                    category_title: &category.title,
                    thread_id: thread.id,
                    thread_title: &thread.title,
                };
                let last_post_url = last_post
                    .as_ref()
                    .map(|post| urls.post_on_page(&route, last_page, post.id));
                let url = urls.thread(&route);
                let reply_url = urls.reply(&route);
                let delete_url = urls.delete(&route);
                let owner = Some(thread.author_id);

                Ok(ThreadView {
                    reply_count: thread_reply_count(posts),
                    last_page,
                    last_post,
                    last_post_url,
                    url,
                    reply_url,
                    delete_url,
                    can_post: policy.allows(actor, Ability::ReplyToThread, owner),
                    can_delete: policy.allows(actor, Ability::Delete, owner),
                    thread,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Thread-specific endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/threads/{id}/posts?page=N&order_by=&order_dir=
///
/// Live posts, newest first unless `order_by` says otherwise.
pub async fn posts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    QueryParams(params): QueryParams<ListParams>,
) -> AppResult<Json<Page<Post>>> {
    let sort = params.sort(PostResource::SORTABLE)?;
    find_live::<ThreadResource>(&state.pool, id).await?;

    let request = PageRequest::new(params.page, state.config.forum.posts_per_page);
    let rows = PostRepo::list_by_thread(&state.pool, id, &request, sort.as_ref()).await?;
    let total = PostRepo::count_by_thread(&state.pool, id).await?;

    tracing::debug!(thread_id = id, page = request.page, total, "Listed thread posts");
    Ok(Json(Page::new(rows, request, total)))
}

/// POST /api/v1/threads/{id}/posts
///
/// Replies to a thread and bumps its `updated_at`.
pub async fn reply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<CreatePost>,
) -> AppResult<(StatusCode, Json<MessageResponse<Post>>)> {
    let actor = user.actor();
    let thread = find_live::<ThreadResource>(&state.pool, id).await?;
    authorize(
        state.policy.as_ref(),
        Some(&actor),
        Ability::ReplyToThread,
        Some(thread.author_id),
    )?;
    input.validate()?;

    let post = PostRepo::create_reply(&state.pool, id, user.user_id, &input).await?;
    tracing::info!(id = post.id, thread_id = id, user_id = user.user_id, "Reply posted");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Post created".to_string(),
            data: post,
        }),
    ))
}
