//! Handlers for the `/categories` resource.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forum_core::access::{authorize, Ability, Actor};
use forum_core::counts::reply_count;
use forum_core::error::CoreError;
use forum_core::hierarchy::validate_parent;
use forum_core::pagination::{Page, PageRequest};
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use forum_db::models::category::{Category, CreateCategory, UpdateCategory};
use forum_db::models::thread::{CreateThread, Thread};
use forum_db::repositories::{category_repo, CategoryRepo, ThreadRepo};
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use crate::config::ForumConfig;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, QueryParams};
use crate::handlers::resource::{find_live, Resource};
use crate::handlers::thread::{ThreadResource, ThreadView};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// A category with its derived attributes.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    /// Live threads in the category.
    pub thread_count: i64,
    /// Replies across the category's live threads (opening posts excluded).
    pub post_count: i64,
    pub url: String,
    pub new_thread_url: String,
    /// Most recently created live thread.
    pub newest_thread: Option<Thread>,
    /// Most recently active live thread.
    pub latest_active_thread: Option<Thread>,
}

pub struct CategoryResource;

#[async_trait]
impl Resource for CategoryResource {
    const ENTITY: &'static str = "Category";
    const SINGULAR: &'static str = "category";
    const PLURAL: &'static str = "categories";
    const SORTABLE: &'static [&'static str] = category_repo::SORTABLE_COLUMNS;

    type Model = Category;
    type View = CategoryView;
    type Update = UpdateCategory;

    fn per_page(config: &ForumConfig) -> i64 {
        config.categories_per_page
    }

    fn owner_id(_model: &Category) -> Option<DbId> {
        None
    }

    fn is_trashed(model: &Category) -> bool {
        model.is_trashed()
    }

    async fn find(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Category>, sqlx::Error> {
        if include_deleted {
            CategoryRepo::find_by_id_include_deleted(pool, id).await
        } else {
            CategoryRepo::find_by_id(pool, id).await
        }
    }

    async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        CategoryRepo::list(pool, page, include_deleted, sort).await
    }

    async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error> {
        CategoryRepo::count(pool, include_deleted).await
    }

    async fn update_quietly(
        state: &AppState,
        _actor: Option<&Actor>,
        model: &Category,
        input: &UpdateCategory,
    ) -> AppResult<Option<Category>> {
        if let Some(parent) = input.category_id {
            check_parent_move(&state.pool, model.id, parent).await?;
        }
        Ok(CategoryRepo::update(&state.pool, model.id, input).await?)
    }

    async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::soft_delete(pool, id).await
    }

    async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::restore(pool, id).await
    }

    async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::hard_delete(pool, id).await
    }

    async fn present_page(
        state: &AppState,
        models: Vec<Category>,
        _actor: Option<&Actor>,
    ) -> AppResult<Vec<CategoryView>> {
        present_categories(state, models).await
    }
}

/// Compute the derived attributes of `categories` with one query per
/// attribute, whatever the number of rows.
pub async fn present_categories(
    state: &AppState,
    categories: Vec<Category>,
) -> AppResult<Vec<CategoryView>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }
    let pool = &state.pool;
    let urls = state.config.forum.urls();
    let ids: Vec<DbId> = categories.iter().map(|category| category.id).collect();

    let mut posts_per_thread: HashMap<DbId, Vec<i64>> = HashMap::new();
    for (category_id, posts) in CategoryRepo::thread_post_counts(pool, &ids).await? {
        posts_per_thread.entry(category_id).or_default().push(posts);
    }
    let mut newest = by_category(ThreadRepo::newest_by_category(pool, &ids).await?);
    let mut latest_active = by_category(ThreadRepo::latest_active_by_category(pool, &ids).await?);

    Ok(categories
        .into_iter()
        .map(|category| {
            let posts = posts_per_thread.remove(&category.id).unwrap_or_default();
            CategoryView {
                thread_count: posts.len() as i64,
                post_count: reply_count(&posts),
                url: urls.category(category.id, &category.title),
                new_thread_url: urls.new_thread(category.id, &category.title),
                newest_thread: newest.remove(&category.id),
                latest_active_thread: latest_active.remove(&category.id),
                category,
            }
        })
        .collect())
}

fn by_category(threads: Vec<Thread>) -> HashMap<DbId, Thread> {
    threads
        .into_iter()
        .map(|thread| (thread.category_id, thread))
        .collect()
}

/// Refuse new or moved threads in a category that is closed to them.
pub(crate) fn ensure_accepts_threads(category: &Category) -> AppResult<()> {
    if category.allows_threads {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(format!(
        "Category {} does not accept threads",
        category.id
    ))))
}

/// Validate re-parenting `category_id` under `parent` (`None` = root).
async fn check_parent_move(
    pool: &PgPool,
    category_id: DbId,
    parent: Option<DbId>,
) -> AppResult<()> {
    let Some(parent_id) = parent else {
        return Ok(());
    };

    let chain = if parent_id == category_id {
        Vec::new()
    } else {
        find_live::<CategoryResource>(pool, parent_id).await?;
        CategoryRepo::parent_chain(pool, parent_id).await?
    };

    validate_parent(category_id, Some(parent_id), &chain)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Category-specific endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<CreateCategory>,
) -> AppResult<(StatusCode, Json<MessageResponse<CategoryView>>)> {
    let actor = user.actor();
    authorize(
        state.policy.as_ref(),
        Some(&actor),
        Ability::CreateCategory,
        None,
    )?;
    input.validate()?;

    if let Some(parent_id) = input.category_id {
        find_live::<CategoryResource>(&state.pool, parent_id).await?;
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(id = category.id, user_id = user.user_id, "Category created");

    let data = CategoryResource::present(&state, category, Some(&actor)).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Category created".to_string(),
            data,
        }),
    ))
}

/// GET /api/v1/categories/{id}/children
pub async fn children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CategoryView>>>> {
    find_live::<CategoryResource>(&state.pool, id).await?;

    let rows = CategoryRepo::list_children(&state.pool, id).await?;
    let data = present_categories(&state, rows).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/categories/{id}/threads?page=N&with_trashed=true&order_by=&order_dir=
///
/// Pinned threads first, then most recently active (or `order_by`).
pub async fn threads(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
    QueryParams(params): QueryParams<ListParams>,
) -> AppResult<Json<Page<ThreadView>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    if params.with_trashed {
        authorize(state.policy.as_ref(), actor.as_ref(), Ability::Restore, None)?;
    }
    let sort = params.sort(ThreadResource::SORTABLE)?;
    find_live::<CategoryResource>(&state.pool, id).await?;

    let request = PageRequest::new(params.page, state.config.forum.threads_per_page);
    let rows = ThreadRepo::list_by_category(
        &state.pool,
        id,
        &request,
        params.with_trashed,
        sort.as_ref(),
    )
    .await?;
    let total = ThreadRepo::count_by_category(&state.pool, id, params.with_trashed).await?;

    let views = ThreadResource::present_page(&state, rows, actor.as_ref()).await?;
    Ok(Json(Page::new(views, request, total)))
}

/// POST /api/v1/categories/{id}/threads
///
/// Starts a thread with its opening post. Only moderators may start it
/// pinned.
pub async fn create_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<CreateThread>,
) -> AppResult<(StatusCode, Json<MessageResponse<ThreadView>>)> {
    let actor = user.actor();
    let category = find_live::<CategoryResource>(&state.pool, id).await?;
    authorize(state.policy.as_ref(), Some(&actor), Ability::CreateThread, None)?;
    ensure_accepts_threads(&category)?;
    if input.pinned == Some(true) {
        authorize(state.policy.as_ref(), Some(&actor), Ability::Moderate, None)?;
    }
    input.validate()?;

    let (thread, _opening_post) =
        ThreadRepo::create_with_opening_post(&state.pool, id, user.user_id, &input).await?;
    tracing::info!(
        id = thread.id,
        category_id = id,
        user_id = user.user_id,
        "Thread created"
    );

    let data = ThreadResource::present(&state, thread, Some(&actor)).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Thread created".to_string(),
            data,
        }),
    ))
}
