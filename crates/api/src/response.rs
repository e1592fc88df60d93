//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope; mutations add a human-readable
//! `message` next to the data.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": "...", "data": T }` envelope returned by mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}
