//! Route definitions for the `/posts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::post::{self, PostResource};
use crate::handlers::resource;
use crate::routes::item_routes;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                         -> index
/// GET    /search                   -> search (?q=)
/// GET    /recent                   -> recent
/// POST   /bulk                     -> bulk
/// GET    /{id}                     -> fetch
/// PUT    /{id}                     -> update (PATCH also accepted)
/// DELETE /{id}                     -> destroy (?force=1)
/// PATCH  /{id}/restore             -> restore
/// ```
pub fn router() -> Router<AppState> {
    item_routes::<PostResource>()
        .route("/", get(resource::index::<PostResource>))
        .route("/search", get(post::search))
        .route("/recent", get(post::recent))
}
