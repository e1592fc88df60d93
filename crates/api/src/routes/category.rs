//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::category::{self, CategoryResource};
use crate::handlers::resource;
use crate::routes::item_routes;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /                         -> index
/// POST   /                         -> create
/// POST   /bulk                     -> bulk
/// GET    /{id}                     -> fetch
/// PUT    /{id}                     -> update (PATCH also accepted)
/// DELETE /{id}                     -> destroy (?force=1)
/// PATCH  /{id}/restore             -> restore
/// GET    /{id}/children            -> children
/// GET    /{id}/threads             -> threads
/// POST   /{id}/threads             -> create_thread
/// ```
pub fn router() -> Router<AppState> {
    item_routes::<CategoryResource>()
        .route(
            "/",
            get(resource::index::<CategoryResource>).post(category::create),
        )
        .route("/{id}/children", get(category::children))
        .route(
            "/{id}/threads",
            get(category::threads).post(category::create_thread),
        )
}
