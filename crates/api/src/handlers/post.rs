//! Handlers for the `/posts` resource.
//!
//! Posts are served as stored; they have no derived attributes.

use async_trait::async_trait;
use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use forum_core::access::{authorize, Ability, Actor};
use forum_core::error::CoreError;
use forum_core::pagination::{Page, PageRequest};
use forum_core::search::post_tsquery;
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use forum_db::models::post::{Post, UpdatePost};
use forum_db::repositories::{post_repo, PostRepo, ThreadRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::config::ForumConfig;
use crate::error::{AppError, AppResult};
use crate::extract::QueryParams;
use crate::handlers::resource::Resource;
use crate::middleware::auth::AuthUser;
use crate::query::{PageParams, SearchParams};
use crate::state::AppState;

pub struct PostResource;

#[async_trait]
impl Resource for PostResource {
    const ENTITY: &'static str = "Post";
    const SINGULAR: &'static str = "post";
    const PLURAL: &'static str = "posts";
    const SORTABLE: &'static [&'static str] = post_repo::SORTABLE_COLUMNS;

    type Model = Post;
    type View = Post;
    type Update = UpdatePost;

    fn per_page(config: &ForumConfig) -> i64 {
        config.posts_per_page
    }

    fn owner_id(model: &Post) -> Option<DbId> {
        Some(model.author_id)
    }

    fn is_trashed(model: &Post) -> bool {
        model.is_trashed()
    }

    async fn find(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Post>, sqlx::Error> {
        if include_deleted {
            PostRepo::find_by_id_include_deleted(pool, id).await
        } else {
            PostRepo::find_by_id(pool, id).await
        }
    }

    async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Post>, sqlx::Error> {
        PostRepo::list(pool, page, include_deleted, sort).await
    }

    async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        PostRepo::count(pool, include_deleted).await
    }

    async fn update_quietly(
        state: &AppState,
        _actor: Option<&Actor>,
        model: &Post,
        input: &UpdatePost,
    ) -> AppResult<Option<Post>> {
        Ok(PostRepo::update_quietly(&state.pool, model.id, input).await?)
    }

    async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        PostRepo::soft_delete(pool, id).await
    }

    async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        PostRepo::restore(pool, id).await
    }

    async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        PostRepo::hard_delete(pool, id).await
    }

    async fn check_parent_live(state: &AppState, model: &Post) -> AppResult<()> {
        if ThreadRepo::find_by_id(&state.pool, model.thread_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Thread {} is in the trash; restore it first",
                model.thread_id
            ))));
        }
        Ok(())
    }

    async fn present_page(
        _state: &AppState,
        models: Vec<Post>,
        _actor: Option<&Actor>,
    ) -> AppResult<Vec<Post>> {
        Ok(models)
    }
}

// ---------------------------------------------------------------------------
// Post-specific endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/posts/search?q=&page=N
///
/// Live posts whose content holds every word of `q` (the last one as a
/// prefix), best match first.
pub async fn search(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Page<Post>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    authorize(state.policy.as_ref(), actor.as_ref(), Ability::View, None)?;
    params.validate()?;

    let tsquery = post_tsquery(&params.q).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Search terms must contain at least one word".into(),
        ))
    })?;

    let request = PageRequest::new(params.page, state.config.forum.posts_per_page);
    let rows = PostRepo::search(&state.pool, &tsquery, &request).await?;
    let total = PostRepo::count_search(&state.pool, &tsquery).await?;

    tracing::debug!(tsquery = %tsquery, page = request.page, total, "Searched posts");
    Ok(Json(Page::new(rows, request, total)))
}

/// GET /api/v1/posts/recent?page=N
///
/// Live posts updated within the configured recent window, most recently
/// updated first.
pub async fn recent(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    QueryParams(params): QueryParams<PageParams>,
) -> AppResult<Json<Page<Post>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    authorize(state.policy.as_ref(), actor.as_ref(), Ability::View, None)?;

    let forum = &state.config.forum;
    let since = Utc::now() - Duration::days(forum.recent_days);
    let request = PageRequest::new(params.page, forum.posts_per_page);
    let rows = PostRepo::recent(&state.pool, since, &request).await?;
    let total = PostRepo::count_recent(&state.pool, since).await?;

    tracing::debug!(since = %since, page = request.page, total, "Listed recent posts");
    Ok(Json(Page::new(rows, request, total)))
}
