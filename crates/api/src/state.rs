use std::sync::Arc;

use forum_core::access::{AccessPolicy, RolePolicy};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: forum_db::DbPool,
    /// Server configuration (pagination sizes, URL root, token secret).
    pub config: Arc<ServerConfig>,
    /// Permission predicate consulted before every guarded operation.
    pub policy: Arc<dyn AccessPolicy>,
}

impl AppState {
    /// State guarded by the built-in [`RolePolicy`].
    pub fn new(pool: forum_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            policy: Arc::new(RolePolicy),
        }
    }
}
