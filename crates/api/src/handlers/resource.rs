//! Generic CRUD controller shared by every forum resource.
//!
//! A [`Resource`] binds a row model to its repository, page size, owner and
//! presenter. The handlers in this module (`index`, `fetch`, `update`,
//! `destroy`, `restore`, `bulk`) are written once and mounted per resource
//! as `index::<ThreadResource>` and so on.
//!
//! Every guarded operation looks the row up first (404 wins over 403),
//! then consults the [`AccessPolicy`](forum_core::access::AccessPolicy) in
//! [`AppState`], and only then validates and mutates.

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::Json;
use forum_core::access::{authorize, Ability, Actor};
use forum_core::bulk::{is_skippable, summary, BulkAction, BulkRequest};
use forum_core::error::CoreError;
use forum_core::pagination::{Page, PageRequest};
use forum_core::sorting::Sort;
use forum_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use crate::config::ForumConfig;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::query::{DestroyParams, ListParams, TrashedParams};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// A model type served by the generic controller.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Entity name used in error messages (`"Thread"`).
    const ENTITY: &'static str;
    /// Lower-case singular noun for messages (`"thread"`).
    const SINGULAR: &'static str;
    /// Lower-case plural noun for messages (`"threads"`).
    const PLURAL: &'static str;
    /// Columns a listing may be ordered by (`?order_by=`).
    const SORTABLE: &'static [&'static str];

    /// The row model.
    type Model: Serialize + Send + Sync + 'static;
    /// The presented model with derived attributes.
    type View: Serialize + Send + 'static;
    /// Partial-update input, also used as bulk `attributes`.
    type Update: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Configured listing page size.
    fn per_page(config: &ForumConfig) -> i64;

    /// Author of the row, `None` for ownerless resources.
    fn owner_id(model: &Self::Model) -> Option<DbId>;

    fn is_trashed(model: &Self::Model) -> bool;

    async fn find(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Self::Model>, sqlx::Error>;

    async fn list(
        pool: &PgPool,
        page: &PageRequest,
        include_deleted: bool,
        sort: Option<&Sort>,
    ) -> Result<Vec<Self::Model>, sqlx::Error>;

    async fn count(pool: &PgPool, include_deleted: bool) -> Result<i64, sqlx::Error>;

    /// Apply `input` to a live row without touching its `updated_at`.
    ///
    /// Resource-specific checks (parent moves, moderation) run here and
    /// report domain errors. `Ok(None)` means the row vanished in the
    /// meantime.
    async fn update_quietly(
        state: &AppState,
        actor: Option<&Actor>,
        model: &Self::Model,
        input: &Self::Update,
    ) -> AppResult<Option<Self::Model>>;

    async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error>;

    async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error>;

    async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error>;

    /// Refuse restoring a row whose parent is still in the trash.
    async fn check_parent_live(_state: &AppState, _model: &Self::Model) -> AppResult<()> {
        Ok(())
    }

    /// Compute the views served for `models` to `actor`, in order.
    ///
    /// Derived attributes are loaded for the whole slice at once.
    async fn present_page(
        state: &AppState,
        models: Vec<Self::Model>,
        actor: Option<&Actor>,
    ) -> AppResult<Vec<Self::View>>;

    /// Compute the view served for `model` to `actor`.
    async fn present(
        state: &AppState,
        model: Self::Model,
        actor: Option<&Actor>,
    ) -> AppResult<Self::View> {
        Self::present_page(state, vec![model], actor)
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::Core(CoreError::Internal(format!(
                    "{} presenter returned no view",
                    Self::ENTITY
                )))
            })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/{resource}?page=N&with_trashed=true&order_by=&order_dir=
pub async fn index<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    QueryParams(params): QueryParams<ListParams>,
) -> AppResult<Json<Page<R::View>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    authorize(state.policy.as_ref(), actor.as_ref(), Ability::View, None)?;
    if params.with_trashed {
        authorize(state.policy.as_ref(), actor.as_ref(), Ability::Restore, None)?;
    }
    let sort = params.sort(R::SORTABLE)?;

    let request = PageRequest::new(params.page, R::per_page(&state.config.forum));
    let rows = R::list(&state.pool, &request, params.with_trashed, sort.as_ref()).await?;
    let total = R::count(&state.pool, params.with_trashed).await?;

    tracing::debug!(
        entity = R::ENTITY,
        page = request.page,
        total,
        with_trashed = params.with_trashed,
        "Listed resources"
    );

    let views = R::present_page(&state, rows, actor.as_ref()).await?;
    Ok(Json(Page::new(views, request, total)))
}

/// GET /api/v1/{resource}/{id}
pub async fn fetch<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
    QueryParams(params): QueryParams<TrashedParams>,
) -> AppResult<Json<DataResponse<R::View>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    if params.with_trashed {
        authorize(state.policy.as_ref(), actor.as_ref(), Ability::Restore, None)?;
    }

    let model = R::find(&state.pool, id, params.with_trashed)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    authorize(
        state.policy.as_ref(),
        actor.as_ref(),
        Ability::View,
        R::owner_id(&model),
    )?;

    let data = R::present(&state, model, actor.as_ref()).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT|PATCH /api/v1/{resource}/{id}
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<R::Update>,
) -> AppResult<Json<MessageResponse<R::View>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    let model = update_one::<R>(&state, actor.as_ref(), id, &input).await?;
    let data = R::present(&state, model, actor.as_ref()).await?;
    Ok(Json(MessageResponse {
        message: message::<R>("updated"),
        data,
    }))
}

/// DELETE /api/v1/{resource}/{id}?force=1
pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
    QueryParams(params): QueryParams<DestroyParams>,
) -> AppResult<Json<MessageResponse<R::Model>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    let force = params.is_forced();
    let data = destroy_one::<R>(&state, actor.as_ref(), id, force).await?;
    let verb = if force { "permanently deleted" } else { "deleted" };
    Ok(Json(MessageResponse {
        message: message::<R>(verb),
        data,
    }))
}

/// PATCH /api/v1/{resource}/{id}/restore
pub async fn restore<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<R::View>>> {
    let actor = user.as_ref().map(AuthUser::actor);
    let model = restore_one::<R>(&state, actor.as_ref(), id).await?;
    let data = R::present(&state, model, actor.as_ref()).await?;
    Ok(Json(MessageResponse {
        message: message::<R>("restored"),
        data,
    }))
}

/// POST /api/v1/{resource}/bulk
///
/// Applies one action to every listed id in order. Items the operation
/// refuses are left out of `data`; a database failure aborts the batch
/// with the items already processed left applied.
pub async fn bulk<R: Resource>(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    JsonBody(request): JsonBody<BulkRequest<R::Update>>,
) -> AppResult<Json<MessageResponse<Vec<R::Model>>>> {
    request.validate()?;
    if let BulkAction::Update { attributes } = &request.action {
        attributes.validate()?;
    }

    let actor = user.as_ref().map(AuthUser::actor);
    let mut processed = Vec::with_capacity(request.items.len());

    for &id in &request.items {
        let outcome = match &request.action {
            BulkAction::Destroy { force } => {
                destroy_one::<R>(&state, actor.as_ref(), id, *force).await
            }
            BulkAction::Restore => restore_one::<R>(&state, actor.as_ref(), id).await,
            BulkAction::Update { attributes } => {
                update_one::<R>(&state, actor.as_ref(), id, attributes).await
            }
        };

        match outcome {
            Ok(model) => processed.push(model),
            Err(err) if err.as_core().is_some_and(is_skippable) => {
                tracing::debug!(entity = R::ENTITY, id, error = %err, "Skipped bulk item");
            }
            Err(err) => return Err(err),
        }
    }

    let verb = request.action.verb();
    tracing::info!(
        entity = R::ENTITY,
        requested = request.items.len(),
        processed = processed.len(),
        action = verb,
        "Bulk operation applied"
    );

    Ok(Json(MessageResponse {
        message: summary(processed.len(), R::SINGULAR, R::PLURAL, verb),
        data: processed,
    }))
}

// ---------------------------------------------------------------------------
// Single-item operations (shared by the item endpoints and bulk)
// ---------------------------------------------------------------------------

/// Update a live row without touching `updated_at`.
pub(crate) async fn update_one<R: Resource>(
    state: &AppState,
    actor: Option<&Actor>,
    id: DbId,
    input: &R::Update,
) -> AppResult<R::Model> {
    let model = find_live::<R>(&state.pool, id).await?;
    authorize(
        state.policy.as_ref(),
        actor,
        Ability::Edit,
        R::owner_id(&model),
    )?;
    input.validate()?;

    let updated = R::update_quietly(state, actor, &model, input)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    tracing::info!(entity = R::ENTITY, id, "Updated resource");
    Ok(updated)
}

/// Soft-delete a live row, or with `force` remove any row permanently.
///
/// Returns the row as it was last seen: with `deleted_at` set after a soft
/// delete, or the removed row after a force delete.
pub(crate) async fn destroy_one<R: Resource>(
    state: &AppState,
    actor: Option<&Actor>,
    id: DbId,
    force: bool,
) -> AppResult<R::Model> {
    let model = R::find(&state.pool, id, true)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    if force {
        authorize(
            state.policy.as_ref(),
            actor,
            Ability::ForceDelete,
            R::owner_id(&model),
        )?;
        if !R::hard_delete(&state.pool, id).await? {
            return Err(not_found::<R>(id));
        }
        tracing::info!(entity = R::ENTITY, id, force, "Deleted resource");
        return Ok(model);
    }

    if R::is_trashed(&model) {
        return Err(not_found::<R>(id));
    }
    authorize(
        state.policy.as_ref(),
        actor,
        Ability::Delete,
        R::owner_id(&model),
    )?;
    if !R::soft_delete(&state.pool, id).await? {
        return Err(not_found::<R>(id));
    }
    tracing::info!(entity = R::ENTITY, id, force, "Deleted resource");

    R::find(&state.pool, id, true)
        .await?
        .ok_or_else(|| not_found::<R>(id))
}

/// Bring a trashed row back. Rows that are live or absent are 404.
pub(crate) async fn restore_one<R: Resource>(
    state: &AppState,
    actor: Option<&Actor>,
    id: DbId,
) -> AppResult<R::Model> {
    let model = R::find(&state.pool, id, true)
        .await?
        .filter(R::is_trashed)
        .ok_or_else(|| not_found::<R>(id))?;

    authorize(
        state.policy.as_ref(),
        actor,
        Ability::Restore,
        R::owner_id(&model),
    )?;
    R::check_parent_live(state, &model).await?;

    if !R::restore(&state.pool, id).await? {
        return Err(not_found::<R>(id));
    }
    tracing::info!(entity = R::ENTITY, id, "Restored resource");

    find_live::<R>(&state.pool, id).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a non-trashed row or fail with 404.
pub(crate) async fn find_live<R: Resource>(pool: &PgPool, id: DbId) -> AppResult<R::Model> {
    R::find(pool, id, false)
        .await?
        .ok_or_else(|| not_found::<R>(id))
}

pub(crate) fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: R::ENTITY,
        id,
    })
}

/// `"Thread deleted"`.
fn message<R: Resource>(verb: &str) -> String {
    format!("{} {verb}", R::ENTITY)
}
