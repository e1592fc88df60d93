pub mod category;
pub mod health;
pub mod post;
pub mod thread;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::resource::{self, Resource};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      list, create
/// /categories/bulk                                 bulk destroy/restore/update
/// /categories/{id}                                 get, update, delete (?force=1)
/// /categories/{id}/restore                         restore (PATCH)
/// /categories/{id}/children                        child categories
/// /categories/{id}/threads                         list, start thread
///
/// /threads                                         list
/// /threads/bulk                                    bulk destroy/restore/update
/// /threads/{id}                                    get, update, delete (?force=1)
/// /threads/{id}/restore                            restore (PATCH)
/// /threads/{id}/posts                              list, reply
///
/// /posts                                           list
/// /posts/search                                    full-text search (?q=)
/// /posts/recent                                    recently updated
/// /posts/bulk                                      bulk destroy/restore/update
/// /posts/{id}                                      get, update, delete (?force=1)
/// /posts/{id}/restore                              restore (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/threads", thread::router())
        .nest("/posts", post::router())
}

/// The generic controller's per-item and bulk routes for one resource.
pub(crate) fn item_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/bulk", post(resource::bulk::<R>))
        .route(
            "/{id}",
            get(resource::fetch::<R>)
                .put(resource::update::<R>)
                .patch(resource::update::<R>)
                .delete(resource::destroy::<R>),
        )
        .route("/{id}/restore", patch(resource::restore::<R>))
}
