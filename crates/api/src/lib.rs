//! Forum API server library.
//!
//! [`router::build_app`] assembles the whole service; the other modules are
//! public so integration tests can reach config, tokens and handlers.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
