//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//!   Use `Option<AuthUser>` on endpoints that also serve anonymous readers.

pub mod auth;
