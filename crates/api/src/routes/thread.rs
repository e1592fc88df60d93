//! Route definitions for the `/threads` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::resource;
use crate::handlers::thread::{self, ThreadResource};
use crate::routes::item_routes;
use crate::state::AppState;

/// Routes mounted at `/threads`.
///
/// ```text
/// GET    /                         -> index
/// POST   /bulk                     -> bulk
/// GET    /{id}                     -> fetch
/// PUT    /{id}                     -> update (PATCH also accepted)
/// DELETE /{id}                     -> destroy (?force=1)
/// PATCH  /{id}/restore             -> restore
/// GET    /{id}/posts               -> posts
/// POST   /{id}/posts               -> reply
/// ```
pub fn router() -> Router<AppState> {
    item_routes::<ThreadResource>()
        .route("/", get(resource::index::<ThreadResource>))
        .route("/{id}/posts", get(thread::posts).post(thread::reply))
}
